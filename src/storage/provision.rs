//! Table provisioning.

use crate::error::{IngestionError, IngestionResult};
use crate::types::{ColumnTypes, StorageType};

use super::{Storage, TableName, quote_identifier};

/// What [`ensure_table`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    /// The table was missing and has been created.
    Created,
    /// The table already existed and was left untouched.
    AlreadyExists,
}

/// Make sure `table` exists, creating it with one column per entry of `columns` if it is missing.
///
/// Column types come from `types`; with `None` every column is [`StorageType::Unbounded`]. An
/// existing table is never altered, even if its columns differ. The create is committed
/// immediately.
pub fn ensure_table<S: Storage + ?Sized>(
    storage: &mut S,
    table: &TableName,
    columns: &[String],
    types: Option<&ColumnTypes>,
) -> IngestionResult<TableStatus> {
    if storage.table_exists(table)? {
        tracing::info!(table = %table.name, "table already exists, leaving schema untouched");
        return Ok(TableStatus::AlreadyExists);
    }

    let sql = create_table_sql(storage, table, columns, types)?;
    tracing::debug!(%sql, "creating table");
    storage.execute(&sql, &[])?;
    storage.commit()?;
    tracing::info!(table = %table.name, columns = columns.len(), "table created");
    Ok(TableStatus::Created)
}

fn create_table_sql<S: Storage + ?Sized>(
    storage: &S,
    table: &TableName,
    columns: &[String],
    types: Option<&ColumnTypes>,
) -> IngestionResult<String> {
    if columns.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: format!("cannot create table '{}' without columns", table.name),
        });
    }

    let mut defs = Vec::with_capacity(columns.len());
    for column in columns {
        let storage_type = match types {
            Some(types) => types.get(column).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("no storage type for column '{column}'"),
            })?,
            None => StorageType::Unbounded,
        };
        defs.push(format!(
            "{} {}",
            quote_identifier(column)?,
            storage.column_type(storage_type)
        ));
    }

    Ok(format!("CREATE TABLE {} ({})", table.quoted()?, defs.join(", ")))
}
