//! Code → display-label lookup tables.
//!
//! Tables are JSON Lines files with one `{"text": ..., "value": ...}` row
//! per line. Matching on `text` is exact but case-insensitive; when several
//! rows share a key the first row wins.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One row of a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRow {
    pub text: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: HashMap<String, String>,
}

impl LookupTable {
    /// Load a table from a JSON Lines file.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be opened, or
    /// [`ModelError::Parse`] if any line is not a lookup row.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let rows = serde_jsonlines::json_lines::<LookupRow, _>(path)
            .map_err(|source| ModelError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ModelError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let table = Self::from_rows(rows);
        tracing::debug!(path = %path.display(), entries = table.len(), "loaded lookup table");
        Ok(table)
    }

    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = LookupRow>) -> Self {
        let mut entries = HashMap::new();
        for row in rows {
            entries.entry(row.text.to_lowercase()).or_insert(row.value);
        }
        Self { entries }
    }

    /// The display label for `code`, if the table has one.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.entries.get(&code.to_lowercase()).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
