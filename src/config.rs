//! Run configuration.
//!
//! Everything the pipeline needs from its environment is carried by an explicit
//! [`IngestConfig`] value. Missing keys in a JSON config file fall back to [`Default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::{IngestionFormat, default_na_values};

/// Default maximum header length, in characters.
pub const DEFAULT_MAX_HEADER_LEN: usize = 125;

/// Target database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file.
    pub path: PathBuf,
    /// Database name recorded in cleaning reports.
    pub name: String,
    /// Optional schema qualifier for the target table (`main` when unset).
    pub schema: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ingest.db"),
            name: "main".to_string(),
            schema: None,
        }
    }
}

/// Options controlling one ingestion run.
///
/// Use [`Default`] for common cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Accepted file extensions, lowercase and without the dot.
    pub allowed_extensions: Vec<String>,
    /// Directory uploads are staged in while a run is in progress.
    pub temp_dir: PathBuf,
    /// Directory cleaning reports are written to.
    pub report_dir: PathBuf,
    /// Headers longer than this many characters are truncated.
    pub max_header_len: usize,
    /// When `false`, every column is created with the unbounded text type.
    pub infer_types: bool,
    /// Worksheet to read from Excel files. The first sheet is used when unset.
    pub excel_sheet: Option<String>,
    /// Cell texts stored as NULL (exact match). Defaults to the common NA spellings
    /// (`NA`, `N/A`, `NULL`, `null`, `None`, `nan`, `#N/A`, ...); `[]` keeps them as text.
    pub na_values: Vec<String>,
    /// Target database.
    pub database: DatabaseConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["csv".to_string(), "xlsx".to_string(), "xls".to_string()],
            temp_dir: PathBuf::from("temp_files"),
            report_dir: PathBuf::from("cleaning_reports"),
            max_header_len: DEFAULT_MAX_HEADER_LEN,
            infer_types: true,
            excel_sheet: None,
            na_values: default_na_values(),
            database: DatabaseConfig::default(),
        }
    }
}

impl IngestConfig {
    /// Load a config from a JSON file and validate it.
    pub fn from_json_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot drive a run.
    pub fn validate(&self) -> IngestionResult<()> {
        if self.max_header_len == 0 {
            return Err(IngestionError::InvalidConfig {
                message: "max_header_len must be at least 1".to_string(),
            });
        }
        if self.allowed_extensions.is_empty() {
            return Err(IngestionError::InvalidConfig {
                message: "allowed_extensions must not be empty".to_string(),
            });
        }
        for ext in &self.allowed_extensions {
            if IngestionFormat::from_extension(ext).is_none() {
                return Err(IngestionError::InvalidConfig {
                    message: format!("no reader for allowed extension '{ext}'"),
                });
            }
        }
        Ok(())
    }

    /// Returns the lowercase extension of `file_name` if it is allowed.
    pub fn check_extension(&self, file_name: &str) -> IngestionResult<String> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        if self
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
        {
            Ok(ext)
        } else {
            Err(IngestionError::UnsupportedFormat { extension: ext })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IngestConfig;
    use crate::error::IngestionError;

    #[test]
    fn default_config_is_valid() {
        let config = IngestConfig::default();
        assert_eq!(config.max_header_len, 125);
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: IngestConfig =
            serde_json::from_str(r#"{"max_header_len": 30, "database": {"name": "py"}}"#).unwrap();
        assert_eq!(config.max_header_len, 30);
        assert_eq!(config.database.name, "py");
        assert_eq!(config.database.path, std::path::PathBuf::from("ingest.db"));
        assert_eq!(config.allowed_extensions, vec!["csv", "xlsx", "xls"]);
        assert!(config.na_values.iter().any(|v| v == "NULL"));

        let bare: IngestConfig = serde_json::from_str(r#"{"na_values": []}"#).unwrap();
        assert!(bare.na_values.is_empty());
    }

    #[test]
    fn zero_header_len_is_rejected() {
        let config = IngestConfig {
            max_header_len: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(IngestionError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let config = IngestConfig::default();
        assert_eq!(config.check_extension("Sales.CSV").unwrap(), "csv");
        assert_eq!(config.check_extension("book.xls").unwrap(), "xls");

        let err = config.check_extension("notes.txt").unwrap_err();
        assert!(matches!(err, IngestionError::UnsupportedFormat { ref extension } if extension == "txt"));
        assert!(config.check_extension("no_extension").is_err());
    }
}
