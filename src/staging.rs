//! Temporary copies of uploads.

use std::path::{Path, PathBuf};

use crate::config::IngestConfig;
use crate::error::{IngestionError, IngestionResult};

/// An upload copied into the temp directory for the duration of one run.
///
/// The copy is deleted when the value is dropped.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    file_name: String,
}

impl StagedFile {
    /// Stage an upload held in memory under `file_name`.
    ///
    /// The extension is checked against `config.allowed_extensions` before anything is written.
    pub fn from_bytes(file_name: &str, bytes: &[u8], config: &IngestConfig) -> IngestionResult<Self> {
        let file_name = base_name(file_name)?;
        config.check_extension(&file_name)?;
        std::fs::create_dir_all(&config.temp_dir)?;

        let path = config.temp_dir.join(&file_name);
        std::fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "staged upload");
        Ok(Self { path, file_name })
    }

    /// Stage a copy of the file at `source`.
    pub fn from_path(source: impl AsRef<Path>, config: &IngestConfig) -> IngestionResult<Self> {
        let source = source.as_ref();
        let file_name = base_name(&source.to_string_lossy())?;
        config.check_extension(&file_name)?;
        std::fs::create_dir_all(&config.temp_dir)?;

        let path = config.temp_dir.join(&file_name);
        if path.exists() && std::fs::canonicalize(&path)? == std::fs::canonicalize(source)? {
            return Err(IngestionError::InvalidConfig {
                message: format!("source {} is already inside the temp directory", source.display()),
            });
        }
        let bytes = std::fs::copy(source, &path)?;
        tracing::debug!(source = %source.display(), path = %path.display(), bytes, "staged file");
        Ok(Self { path, file_name })
    }

    /// Location of the staged copy.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the upload, without directories.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove staged file");
        }
    }
}

fn base_name(file_name: &str) -> IngestionResult<String> {
    Path::new(file_name)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| IngestionError::UnsupportedFormat {
            extension: String::new(),
        })
}
