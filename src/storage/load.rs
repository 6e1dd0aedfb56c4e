//! Row loading.

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Value};

use super::{Storage, TableName, quote_identifier};

/// Insert every row of `dataset` into `table`, in order, then commit once.
///
/// Each row is one parameterized `INSERT`; cells are converted with
/// [`Value::to_storage_text`], so nulls, NaN and `"nan"` strings are stored as SQL NULL. A
/// failure stops the load and is returned as-is; rows sent before it stay pending in the session
/// until the caller rolls back.
pub fn insert_rows<S: Storage + ?Sized>(
    storage: &mut S,
    table: &TableName,
    dataset: &DataSet,
) -> IngestionResult<usize> {
    let sql = insert_sql(table, &dataset.columns)?;
    tracing::debug!(%sql, rows = dataset.row_count(), "inserting rows");

    let width = dataset.column_count();
    for (idx, row) in dataset.rows.iter().enumerate() {
        if row.len() != width {
            return Err(IngestionError::SchemaMismatch {
                message: format!("row {} has {} values but the table has {width} columns", idx + 1, row.len()),
            });
        }
        let params: Vec<Option<String>> = row.iter().map(Value::to_storage_text).collect();
        storage.execute(&sql, &params)?;
    }

    storage.commit()?;
    tracing::info!(table = %table.name, rows = dataset.row_count(), "rows inserted");
    Ok(dataset.row_count())
}

fn insert_sql(table: &TableName, columns: &[String]) -> IngestionResult<String> {
    let cols = columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<IngestionResult<Vec<_>>>()?;
    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        table.quoted()?,
        cols.join(", ")
    ))
}
