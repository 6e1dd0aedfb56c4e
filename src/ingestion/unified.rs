//! Unified reading entrypoint.
//!
//! Most callers should use [`read_from_path`], which reads a CSV or Excel file into an in-memory
//! [`crate::types::DataSet`].
//!
//! - If [`ReadOptions::format`] is `None`, the format is inferred from the file extension.
//! - Allowed-extension policy is enforced by the pipeline ([`crate::config::IngestConfig`]);
//!   this layer only knows which formats have a reader.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::DataSet;

use super::{csv, default_na_values};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Options controlling [`read_from_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Worksheet to read from Excel files; the first sheet when `None`.
    pub excel_sheet: Option<String>,
    /// Cell texts read as null. Empty cells are always null.
    pub na_values: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            format: None,
            excel_sheet: None,
            na_values: default_na_values(),
        }
    }
}

/// Read a CSV or Excel file into a [`DataSet`].
///
/// # Examples
///
/// ```no_run
/// use tabular_ingest::ingestion::{read_from_path, ReadOptions};
///
/// # fn main() -> Result<(), tabular_ingest::IngestionError> {
/// let ds = read_from_path("people.csv", &ReadOptions::default())?;
/// println!("columns={:?} rows={}", ds.columns, ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn read_from_path(path: impl AsRef<Path>, options: &ReadOptions) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    match fmt {
        IngestionFormat::Csv => csv::read_csv_from_path(path, &options.na_values),
        IngestionFormat::Excel => {
            read_excel_dispatch(path, options.excel_sheet.as_deref(), &options.na_values)
        }
    }
}

/// Infer the reader for `path` from its extension.
pub fn infer_format_from_path(path: &Path) -> IngestionResult<IngestionFormat> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or_default();

    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat {
        extension: ext.to_ascii_lowercase(),
    })
}

fn read_excel_dispatch(path: &Path, sheet: Option<&str>, na_values: &[String]) -> IngestionResult<DataSet> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, sheet, na_values);

    #[cfg(feature = "excel")]
    {
        super::excel::read_excel_from_path(path, sheet, na_values)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestionError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_ascii_lowercase(),
        })
    }
}
