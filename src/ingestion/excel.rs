#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Value};

use super::{dedupe_headers, header_name, text_cell};

/// Read one worksheet of an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into a `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Reads remaining rows and converts cells into [`Value`]s, padding ragged rows with nulls
/// - Text cells equal to one of `na_values` become [`Value::Null`]
/// - Date/time cells become `YYYY-MM-DD HH:MM:SS` text (`HH:MM:SS` for time-only cells and
///   durations), never the raw serial number
pub fn read_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    na_values: &[String],
) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestionError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    read_sheet_range(&range, na_values).map_err(|e| wrap_schema_err_with_sheet(&sheet, e))
}

fn read_sheet_range(range: &calamine::Range<Data>, na_values: &[String]) -> IngestionResult<DataSet> {
    let mut rows_iter = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let header = rows_iter.next().ok_or_else(|| IngestionError::SchemaMismatch {
        message: "sheet has no non-empty rows (no header row found)".to_string(),
    })?;
    let columns = dedupe_headers(
        header
            .iter()
            .enumerate()
            .map(|(idx, c)| header_name(idx, &cell_to_header_string(c)))
            .collect(),
    );

    let rows: Vec<Vec<Value>> = rows_iter
        .map(|row| {
            (0..columns.len())
                .map(|idx| convert_cell(row.get(idx).unwrap_or(&Data::Empty), na_values))
                .collect()
        })
        .collect();

    Ok(DataSet::new(columns, rows))
}

fn wrap_schema_err_with_sheet(sheet: &str, err: IngestionError) -> IngestionError {
    match err {
        IngestionError::SchemaMismatch { message } => IngestionError::SchemaMismatch {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::DateTime(dt) => datetime_text(dt),
        Data::Empty => String::new(),
        _ => c.to_string(),
    }
}

fn convert_cell(c: &Data, na_values: &[String]) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) => text_cell(s, na_values),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::Utf8(datetime_text(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
        _ => Value::Utf8(c.to_string()),
    }
}

/// Calendar text for a date/time serial. Serials below one day carry no date part.
fn datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() || dt.as_f64() < 1.0 {
        return clock_text(dt.as_f64());
    }
    match dt.as_datetime() {
        Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}

fn clock_text(days: f64) -> String {
    let total = (days * 86_400.0).round() as i64;
    let (sign, total) = if total < 0 { ("-", -total) } else { ("", total) };
    format!("{sign}{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
