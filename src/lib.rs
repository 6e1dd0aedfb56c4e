//! `tabular-ingest` loads user-supplied CSV and Excel files into a SQL table.
//!
//! The primary entrypoint is [`pipeline::IngestionPipeline`], which for each upload:
//!
//! 1. stages the file in a temp directory after checking its extension,
//! 2. reads it into an in-memory [`types::DataSet`] with every cell kept as text,
//! 3. truncates overlong headers ([`processing::sanitize_headers`]),
//! 4. picks a text storage tier per column ([`processing::infer_storage_types`]),
//! 5. creates the target table if it is missing ([`storage::ensure_table`]),
//! 6. inserts the rows one parameterized statement at a time ([`storage::insert_rows`]),
//! 7. writes a JSON cleaning report ([`report::IngestionReport`]).
//!
//! ## What you can ingest
//!
//! - **CSV**: `.csv`
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls` (plus `.xlsm`,
//!   `.xlsb`, `.ods` if added to [`config::IngestConfig::allowed_extensions`])
//!
//! Empty cells become SQL NULL, as do NaN values and strings equal to `"nan"` in any case.
//! Every other value is stored as its text.
//!
//! ## Storage tiers
//!
//! | longest value | [`types::StorageType`] | SQL type       |
//! |---------------|------------------------|----------------|
//! | ≤ 10          | `Varchar10`            | `VARCHAR(10)`  |
//! | ≤ 50          | `Varchar50`            | `VARCHAR(50)`  |
//! | ≤ 100         | `Varchar100`           | `VARCHAR(100)` |
//! | > 100 or none | `Unbounded`            | `TEXT`         |
//!
//! ## Quick example
//!
//! ```no_run
//! use tabular_ingest::config::IngestConfig;
//! use tabular_ingest::pipeline::IngestionPipeline;
//! use tabular_ingest::storage::SqliteStorage;
//!
//! # fn main() -> Result<(), tabular_ingest::IngestionError> {
//! let config = IngestConfig::default();
//! let storage = SqliteStorage::open("warehouse.db", "warehouse")?;
//! let mut pipeline = IngestionPipeline::new(storage, config)?;
//!
//! let outcome = pipeline.ingest_path("uploads/sales.xlsx", "sales_data")?;
//! for trim in &outcome.header_trims {
//!     println!("{trim}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV/Excel readers and outcome observers
//! - [`processing`]: header cleaning and storage tier inference
//! - [`storage`]: the [`storage::Storage`] trait, SQLite session, table creation and row loading
//! - [`report`]: JSON cleaning reports
//! - [`pipeline`]: the end-to-end run
//! - [`config`], [`staging`], [`types`], [`error`]

pub mod config;
pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod staging;
pub mod storage;
pub mod types;

pub use error::{IngestionError, IngestionResult};
