//! Errors raised while assembling [`crate::TriageConfig`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `TRIAGE_*` variable could not be read into the schema.
    #[error("failed to load configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A section the command needs has empty required keys.
    #[error("[{section}] is missing {}", missing.join(", "))]
    NotConfigured {
        section: &'static str,
        missing: Vec<&'static str>,
    },

    /// A key loaded but its value is unusable.
    #[error("{field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
