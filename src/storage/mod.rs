//! Relational storage.
//!
//! The pipeline talks to the database through the [`Storage`] trait: a catalog lookup, one
//! parameterized `execute`, `commit` and `rollback`. [`SqliteStorage`] is the bundled
//! implementation.
//!
//! Table and column names reach SQL only through [`quote_identifier`]; cell values only as bound
//! parameters.

pub mod load;
pub mod provision;
pub mod sqlite;

use crate::error::{IngestionError, IngestionResult};
use crate::types::StorageType;

pub use load::insert_rows;
pub use provision::{TableStatus, ensure_table};
pub use sqlite::SqliteStorage;

/// A database session the pipeline can create tables in and insert rows into.
///
/// Statements run inside the session's current unit of work until [`Storage::commit`].
pub trait Storage {
    /// Database name recorded in cleaning reports.
    fn database_name(&self) -> &str;

    /// Returns `true` if `table` exists in the catalog.
    fn table_exists(&mut self, table: &TableName) -> IngestionResult<bool>;

    /// Execute one statement with positional `?` parameters; `None` binds SQL NULL.
    ///
    /// Returns the number of affected rows.
    fn execute(&mut self, sql: &str, params: &[Option<String>]) -> IngestionResult<usize>;

    /// Make everything executed since the last commit durable.
    fn commit(&mut self) -> IngestionResult<()>;

    /// Discard everything executed since the last commit. A no-op when nothing is pending.
    fn rollback(&mut self) -> IngestionResult<()>;

    /// Column type used for `storage` in `CREATE TABLE`.
    fn column_type(&self, storage: StorageType) -> &'static str {
        storage.sql_type()
    }
}

/// A possibly schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    /// Schema qualifier; the session default when `None`.
    pub schema: Option<String>,
    /// Bare table name.
    pub name: String,
}

impl TableName {
    /// Build a table name from user input.
    ///
    /// Surrounding whitespace is dropped; a blank name is [`IngestionError::MissingTableName`].
    pub fn new(name: &str, schema: Option<&str>) -> IngestionResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IngestionError::MissingTableName);
        }
        Ok(Self {
            schema: schema.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
            name: name.to_string(),
        })
    }

    /// Quoted `"schema"."name"` (or `"name"`) for use in SQL text.
    pub fn quoted(&self) -> IngestionResult<String> {
        let name = quote_identifier(&self.name)?;
        match &self.schema {
            Some(schema) => Ok(format!("{}.{name}", quote_identifier(schema)?)),
            None => Ok(name),
        }
    }
}

/// Quote an identifier with ANSI double quotes, doubling any embedded quote.
///
/// Empty identifiers and identifiers containing NUL are rejected.
pub fn quote_identifier(ident: &str) -> IngestionResult<String> {
    if ident.is_empty() {
        return Err(IngestionError::InvalidIdentifier {
            name: ident.to_string(),
            reason: "identifier is empty".to_string(),
        });
    }
    if ident.contains('\0') {
        return Err(IngestionError::InvalidIdentifier {
            name: ident.replace('\0', "\\0"),
            reason: "identifier contains a NUL character".to_string(),
        });
    }
    Ok(format!("\"{}\"", ident.replace('"', "\"\"")))
}

#[cfg(test)]
mod tests {
    use super::{TableName, quote_identifier};
    use crate::error::IngestionError;

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quote_identifier("sales").unwrap(), "\"sales\"");
        assert_eq!(
            quote_identifier("x\"; DROP TABLE t; --").unwrap(),
            "\"x\"\"; DROP TABLE t; --\""
        );
        assert_eq!(quote_identifier("[bracket]").unwrap(), "\"[bracket]\"");
    }

    #[test]
    fn quoting_rejects_empty_and_nul() {
        assert!(matches!(
            quote_identifier(""),
            Err(IngestionError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            quote_identifier("a\0b"),
            Err(IngestionError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn table_name_trims_and_requires_a_name() {
        let t = TableName::new("  sales_data ", Some("main")).unwrap();
        assert_eq!(t.name, "sales_data");
        assert_eq!(t.quoted().unwrap(), "\"main\".\"sales_data\"");

        let bare = TableName::new("t", Some("  ")).unwrap();
        assert_eq!(bare.schema, None);
        assert_eq!(bare.quoted().unwrap(), "\"t\"");

        assert!(matches!(
            TableName::new("   ", None),
            Err(IngestionError::MissingTableName)
        ));
    }
}
