//! Model and lookup error types.

use std::path::PathBuf;

/// Errors that can occur while loading or running classifiers and lookups.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Artifact file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON / JSON Lines for its format.
    #[error("Failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// Artifact parsed but is internally inconsistent.
    #[error("Invalid model artifact: {0}")]
    Invalid(String),

    /// The model produced no classes to choose from.
    #[error("Model has no classes")]
    NoClasses,
}
