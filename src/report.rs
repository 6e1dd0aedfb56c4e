//! Cleaning reports.
//!
//! One JSON file per ingested source, named `<source stem>_cleaning_report.json`:
//!
//! ```json
//! {
//!     "file_name": "sales.csv",
//!     "header_cleaning": [
//!         { "original_column": "...", "cleaned_column": "..." }
//!     ],
//!     "sql_table_name": "sales",
//!     "sql_database_name": "main"
//! }
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::IngestionResult;
use crate::types::HeaderTrim;

/// Suffix appended to the source file stem.
pub const REPORT_SUFFIX: &str = "_cleaning_report.json";

/// One header change in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCleaningEntry {
    pub original_column: String,
    pub cleaned_column: String,
}

impl From<&HeaderTrim> for HeaderCleaningEntry {
    fn from(trim: &HeaderTrim) -> Self {
        Self {
            original_column: trim.original.clone(),
            cleaned_column: trim.cleaned.clone(),
        }
    }
}

/// The durable record of one load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    pub file_name: String,
    pub header_cleaning: Vec<HeaderCleaningEntry>,
    pub sql_table_name: String,
    pub sql_database_name: String,
}

impl IngestionReport {
    /// Build a report from the trims of one run.
    pub fn new(
        file_name: impl Into<String>,
        trims: &[HeaderTrim],
        table_name: impl Into<String>,
        database_name: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            header_cleaning: trims.iter().map(HeaderCleaningEntry::from).collect(),
            sql_table_name: table_name.into(),
            sql_database_name: database_name.into(),
        }
    }

    /// Path the report for this source is written to inside `output_dir`.
    pub fn path_in(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(report_file_name(&self.file_name))
    }

    /// Write the report into `output_dir` (created if absent), replacing any previous report
    /// for the same source. Returns the written path.
    pub fn write_to_dir(&self, output_dir: impl AsRef<Path>) -> IngestionResult<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let path = self.path_in(output_dir);
        let mut out = BufWriter::new(File::create(&path)?);
        let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        out.flush()?;

        tracing::info!(
            path = %path.display(),
            header_changes = self.header_cleaning.len(),
            "cleaning report written"
        );
        Ok(path)
    }

    /// Read a previously written report.
    pub fn read_from_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// `<stem>_cleaning_report.json` for a source file name (directories are ignored).
pub fn report_file_name(source_file_name: &str) -> String {
    let stem = Path::new(source_file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}{REPORT_SUFFIX}")
}
