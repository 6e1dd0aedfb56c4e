use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by every stage of the ingestion pipeline.
///
/// Reader, storage and report failures are wrapped without translation so callers see the
/// underlying cause.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel reading error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV reading error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Error raised by the SQLite storage session.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Report or config (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is not in the allowed set (or has no reader).
    #[error("unsupported file type '{extension}'")]
    UnsupportedFormat { extension: String },

    /// The target table name was empty or blank.
    #[error("table name is required")]
    MissingTableName,

    /// The input does not have the expected shape (ragged rows, missing type mapping, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// Two columns share the same name after header cleaning.
    #[error("duplicate column name '{name}' after header cleaning")]
    DuplicateColumn { name: String },

    /// A table, schema or column name cannot be quoted safely.
    #[error("invalid identifier '{name}': {reason}")]
    InvalidIdentifier { name: String, reason: String },

    /// Configuration values that cannot drive an ingestion run.
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}
