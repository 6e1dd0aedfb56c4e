//! In-memory dataset preparation before loading.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion.
//! It never changes cell values.
//!
//! Currently implemented:
//!
//! - [`sanitize_headers()`]: truncate overlong headers and record each trim
//! - [`infer_storage_types()`]: pick a storage tier per column from value lengths
//!
//! ## Example: sanitize → infer
//!
//! ```rust
//! use tabular_ingest::processing::{infer_storage_types, sanitize_headers};
//! use tabular_ingest::types::{DataSet, StorageType, Value};
//!
//! let ds = DataSet::new(
//!     vec!["A".repeat(130)],
//!     vec![vec![Value::Utf8("x".to_string())]],
//! );
//!
//! let (ds, trims) = sanitize_headers(ds, 125).unwrap();
//! assert_eq!(trims.len(), 1);
//! assert_eq!(ds.columns[0].len(), 125);
//!
//! let types = infer_storage_types(&ds);
//! assert_eq!(types.get(&ds.columns[0]), Some(StorageType::Varchar10));
//! ```

pub mod headers;
pub mod inference;

pub use headers::sanitize_headers;
pub use inference::infer_storage_types;
