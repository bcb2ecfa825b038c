//! Report store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or appending report stores.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The store file or its directory could not be read or written.
    #[error("Report store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing row could not be decoded.
    #[error("Corrupt row in report store {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}
