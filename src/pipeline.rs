//! End-to-end ingestion: stage → read → clean headers → infer types → create table → insert
//! rows → write report.
//!
//! ```no_run
//! use tabular_ingest::config::IngestConfig;
//! use tabular_ingest::pipeline::IngestionPipeline;
//! use tabular_ingest::storage::SqliteStorage;
//!
//! # fn main() -> Result<(), tabular_ingest::IngestionError> {
//! let config = IngestConfig::default();
//! let storage = SqliteStorage::open(&config.database.path, config.database.name.clone())?;
//! let mut pipeline = IngestionPipeline::new(storage, config)?;
//!
//! let outcome = pipeline.ingest_path("sales.csv", "sales_data")?;
//! println!("rows={} report={}", outcome.rows_inserted, outcome.report_path.display());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::IngestConfig;
use crate::error::IngestionResult;
use crate::ingestion::{
    IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, ReadOptions, read_from_path,
    severity_for_error,
};
use crate::processing::{infer_storage_types, sanitize_headers};
use crate::report::IngestionReport;
use crate::staging::StagedFile;
use crate::storage::{Storage, TableName, TableStatus, ensure_table, insert_rows};
use crate::types::{ColumnTypes, HeaderTrim, StorageType};

/// Result of one successful run.
#[derive(Debug, Clone)]
pub struct IngestionOutcome {
    /// Source file name (without directories).
    pub file_name: String,
    /// Table the rows were loaded into.
    pub table: TableName,
    /// Number of inserted rows.
    pub rows_inserted: usize,
    /// Headers shortened by header cleaning, in column order.
    pub header_trims: Vec<HeaderTrim>,
    /// Storage tier used for each column when the table is created.
    pub column_types: ColumnTypes,
    /// Whether the table was created by this run.
    pub table_status: TableStatus,
    /// Location of the written cleaning report.
    pub report_path: PathBuf,
}

/// Runs uploads into one storage session.
///
/// Every operation takes `&mut self`: a pipeline (and its session) serves one run at a time.
pub struct IngestionPipeline<S: Storage> {
    storage: S,
    config: IngestConfig,
    observer: Option<Arc<dyn IngestionObserver>>,
    alert_at_or_above: IngestionSeverity,
}

impl<S: Storage + fmt::Debug> fmt::Debug for IngestionPipeline<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("storage", &self.storage)
            .field("config", &self.config)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl<S: Storage> IngestionPipeline<S> {
    /// Create a pipeline after validating `config`.
    pub fn new(storage: S, config: IngestConfig) -> IngestionResult<Self> {
        config.validate()?;
        Ok(Self {
            storage,
            config,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        })
    }

    /// Report outcomes to `observer`; failures at or above `alert_at_or_above` also raise
    /// `on_alert`.
    pub fn with_observer(mut self, observer: Arc<dyn IngestionObserver>, alert_at_or_above: IngestionSeverity) -> Self {
        self.observer = Some(observer);
        self.alert_at_or_above = alert_at_or_above;
        self
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// The storage session.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the pipeline and return its storage session.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Ingest the file at `source` into `table_name`.
    pub fn ingest_path(&mut self, source: impl AsRef<Path>, table_name: &str) -> IngestionResult<IngestionOutcome> {
        let source = source.as_ref();
        let file_name = source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.observe(&file_name, table_name, |pipeline| {
            let table = pipeline.table_name(table_name)?;
            let staged = StagedFile::from_path(source, &pipeline.config)?;
            pipeline.load_staged(&staged, table)
        })
    }

    /// Ingest an upload held in memory as `file_name` into `table_name`.
    pub fn ingest_upload(&mut self, file_name: &str, bytes: &[u8], table_name: &str) -> IngestionResult<IngestionOutcome> {
        self.observe(file_name, table_name, |pipeline| {
            let table = pipeline.table_name(table_name)?;
            let staged = StagedFile::from_bytes(file_name, bytes, &pipeline.config)?;
            pipeline.load_staged(&staged, table)
        })
    }

    fn table_name(&self, table_name: &str) -> IngestionResult<TableName> {
        TableName::new(table_name, self.config.database.schema.as_deref())
    }

    fn load_staged(&mut self, staged: &StagedFile, table: TableName) -> IngestionResult<IngestionOutcome> {
        let read_options = ReadOptions {
            format: None,
            excel_sheet: self.config.excel_sheet.clone(),
            na_values: self.config.na_values.clone(),
        };
        let raw = read_from_path(staged.path(), &read_options)?;
        tracing::debug!(
            file = %staged.file_name(),
            columns = raw.column_count(),
            rows = raw.row_count(),
            "file read"
        );

        let (dataset, header_trims) = sanitize_headers(raw, self.config.max_header_len)?;
        let column_types = if self.config.infer_types {
            infer_storage_types(&dataset)
        } else {
            ColumnTypes::uniform(dataset.columns.iter().map(String::as_str), StorageType::Unbounded)
        };

        let stored = ensure_table(&mut self.storage, &table, &dataset.columns, Some(&column_types))
            .and_then(|status| insert_rows(&mut self.storage, &table, &dataset).map(|rows| (status, rows)));
        let (table_status, rows_inserted) = match stored {
            Ok(stored) => stored,
            Err(err) => {
                self.discard_pending(&table);
                return Err(err);
            }
        };

        let report = IngestionReport::new(
            staged.file_name(),
            &header_trims,
            table.name.clone(),
            self.storage.database_name(),
        );
        let report_path = report.write_to_dir(&self.config.report_dir)?;

        Ok(IngestionOutcome {
            file_name: staged.file_name().to_string(),
            table,
            rows_inserted,
            header_trims,
            column_types,
            table_status,
            report_path,
        })
    }

    /// Discard what a failed load sent to the session. The load's own error is returned to the
    /// caller; a rollback failure is only logged.
    fn discard_pending(&mut self, table: &TableName) {
        if let Err(err) = self.storage.rollback() {
            tracing::warn!(table = %table.name, error = %err, "rollback after failed load failed");
        }
    }

    fn observe<F>(&mut self, file_name: &str, table_name: &str, run: F) -> IngestionResult<IngestionOutcome>
    where
        F: FnOnce(&mut Self) -> IngestionResult<IngestionOutcome>,
    {
        let result = run(&mut *self);

        if let Some(obs) = self.observer.as_ref() {
            let ctx = IngestionContext {
                file_name: file_name.to_string(),
                table_name: table_name.to_string(),
            };
            match &result {
                Ok(outcome) => obs.on_success(
                    &ctx,
                    IngestionStats {
                        rows: outcome.rows_inserted,
                        trimmed_headers: outcome.header_trims.len(),
                        table_created: outcome.table_status == TableStatus::Created,
                    },
                ),
                Err(e) => {
                    let sev = severity_for_error(e);
                    obs.on_failure(&ctx, sev, e);
                    if sev >= self.alert_at_or_above {
                        obs.on_alert(&ctx, sev, e);
                    }
                }
            }
        }

        result
    }
}
