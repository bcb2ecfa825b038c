//! Append-only JSON Lines report stores.
//!
//! Rows are only ever appended with `serde_jsonlines::append_json_lines`;
//! history from earlier runs is never rewritten.

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::ReportError;

#[derive(Debug, Clone)]
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `rows`, creating the file and its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the directory or file cannot be written.
    pub fn append<T: Serialize>(&self, rows: &[T]) -> Result<usize, ReportError> {
        if rows.is_empty() {
            return Ok(0);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        serde_jsonlines::append_json_lines(&self.path, rows).map_err(|source| self.io_error(source))?;
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "appended report rows");
        Ok(rows.len())
    }

    /// Every row in the store. A store that does not exist yet is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the file exists but cannot be read, or
    /// [`ReportError::Parse`] if a row does not decode as `T`.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>, ReportError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        serde_jsonlines::json_lines(&self.path)
            .map_err(|source| self.io_error(source))?
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| ReportError::Parse {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    fn io_error(&self, source: std::io::Error) -> ReportError {
        ReportError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
