//! CSV reading.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Value};

use super::{dedupe_headers, header_name, text_cell};

/// Read a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The first record is the header row; repeated headers are renamed `name.1`, `name.2`, ...
/// - Every cell is kept as text, byte for byte; empty cells and cells equal to one of
///   `na_values` become [`Value::Null`].
/// - Rows shorter than the header are padded with nulls; longer rows are rejected.
pub fn read_csv_from_path(path: impl AsRef<Path>, na_values: &[String]) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr, na_values)
}

/// Read CSV data from an existing CSV reader.
///
/// The reader should be configured with `has_headers(true)`; `flexible(true)` is needed for
/// short rows to be padded rather than rejected by the `csv` crate itself.
pub fn read_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    na_values: &[String],
) -> IngestionResult<DataSet> {
    let columns = dedupe_headers(
        rdr.headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| header_name(idx, h))
            .collect(),
    );

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        if record.len() > columns.len() {
            return Err(IngestionError::SchemaMismatch {
                message: format!(
                    "row {user_row} has {} fields but the header has {}",
                    record.len(),
                    columns.len()
                ),
            });
        }

        let mut row: Vec<Value> = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            row.push(match record.get(idx) {
                Some(raw) => text_cell(raw, na_values),
                None => Value::Null,
            });
        }
        rows.push(row);
    }

    Ok(DataSet::new(columns, rows))
}
