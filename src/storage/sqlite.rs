//! SQLite-backed [`Storage`].

use std::path::Path;

use rusqlite::{Connection, params, params_from_iter};

use crate::error::IngestionResult;

use super::{Storage, TableName, quote_identifier};

/// Schema searched when a [`TableName`] has no qualifier.
const DEFAULT_SCHEMA: &str = "main";

/// A SQLite session.
///
/// The first statement after a commit opens a transaction, so nothing is durable until
/// [`Storage::commit`]; [`Storage::rollback`] discards it. Dropping the session with uncommitted
/// work discards that work too.
pub struct SqliteStorage {
    conn: Connection,
    database_name: String,
    in_transaction: bool,
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage")
            .field("database_name", &self.database_name)
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}

impl SqliteStorage {
    /// Open (or create) the database file at `path`, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>, database_name: impl Into<String>) -> IngestionResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened sqlite database");
        Ok(Self::from_connection(conn, database_name))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(database_name: impl Into<String>) -> IngestionResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?, database_name))
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection, database_name: impl Into<String>) -> Self {
        Self {
            conn,
            database_name: database_name.into(),
            in_transaction: false,
        }
    }

    /// The underlying connection, e.g. for reading back loaded rows.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn begin_if_needed(&mut self) -> IngestionResult<()> {
        if !self.in_transaction {
            self.conn.execute_batch("BEGIN")?;
            self.in_transaction = true;
        }
        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    fn table_exists(&mut self, table: &TableName) -> IngestionResult<bool> {
        let schema = table.schema.as_deref().unwrap_or(DEFAULT_SCHEMA);
        let sql = format!(
            "SELECT 1 FROM {}.sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            quote_identifier(schema)?
        );
        let mut stmt = self.conn.prepare(&sql)?;
        Ok(stmt.exists(params![table.name])?)
    }

    fn execute(&mut self, sql: &str, params: &[Option<String>]) -> IngestionResult<usize> {
        self.begin_if_needed()?;
        Ok(self.conn.execute(sql, params_from_iter(params.iter()))?)
    }

    fn commit(&mut self) -> IngestionResult<()> {
        if self.in_transaction {
            self.conn.execute_batch("COMMIT")?;
            self.in_transaction = false;
            tracing::debug!(database = %self.database_name, "committed");
        }
        Ok(())
    }

    fn rollback(&mut self) -> IngestionResult<()> {
        if self.in_transaction {
            self.conn.execute_batch("ROLLBACK")?;
            self.in_transaction = false;
            tracing::debug!(database = %self.database_name, "rolled back");
        }
        Ok(())
    }
}
