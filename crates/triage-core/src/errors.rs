//! Cross-cutting error types for Triage.
//!
//! [`CoreError`] is for failures that abort a whole run. [`PipelineError`]
//! is the per-ticket taxonomy: it never aborts a batch, it is collected next
//! to the successful records so callers can tell "this ticket failed" from
//! "the run failed".

use thiserror::Error;

use crate::state::ReconcileState;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The top-level ticket payload could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Per-ticket failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A reference field (`caller_id`, `opened_by`) is absent or malformed.
    /// The ticket is skipped, not defaulted.
    #[error("Malformed input for {incident}: {field} is not a reference with a value")]
    MalformedInput { incident: String, field: &'static str },

    /// The prediction has no incident number to address the update with.
    #[error("Prediction has no incident number")]
    MissingIdentifier,

    /// The business number did not resolve to a `sys_id`.
    #[error("Could not resolve sys_id for {incident}: {reason}")]
    ResolveFailure { incident: String, reason: String },

    /// The update call did not complete.
    #[error("Transport error updating {incident}: {source}")]
    Transport {
        incident: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The update call returned a non-success status.
    #[error("Update of {incident} failed ({status}): {body}")]
    NonSuccessStatus {
        incident: String,
        status: u16,
        body: String,
    },

    /// A classifier failed on this ticket's features.
    #[error("Inference failed for {incident}: {reason}")]
    Inference { incident: String, reason: String },
}

impl PipelineError {
    /// The incident this error belongs to, if known.
    #[must_use]
    pub fn incident(&self) -> Option<&str> {
        match self {
            Self::MalformedInput { incident, .. }
            | Self::ResolveFailure { incident, .. }
            | Self::Transport { incident, .. }
            | Self::NonSuccessStatus { incident, .. }
            | Self::Inference { incident, .. } => Some(incident),
            Self::MissingIdentifier => None,
        }
    }

    /// The reconcile state a ticket ends in because of this error.
    ///
    /// `None` for errors raised before reconciliation starts.
    #[must_use]
    pub const fn terminal_state(&self) -> Option<ReconcileState> {
        match self {
            Self::MissingIdentifier | Self::ResolveFailure { .. } => {
                Some(ReconcileState::SkippedResolveFailed)
            }
            Self::Transport { .. } | Self::NonSuccessStatus { .. } => Some(ReconcileState::Failed),
            Self::MalformedInput { .. } | Self::Inference { .. } => None,
        }
    }
}
