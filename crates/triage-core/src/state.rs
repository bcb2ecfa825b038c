//! Per-ticket reconcile state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a ticket is in the update flow.
///
/// ```text
/// received → identifier_resolved → payload_built → applied → failed
///          → skipped_resolve_failed               → skipped_no_trigger
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileState {
    Received,
    IdentifierResolved,
    PayloadBuilt,
    Applied,
    SkippedNoTrigger,
    SkippedResolveFailed,
    Failed,
}

impl ReconcileState {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Received => &[Self::IdentifierResolved, Self::SkippedResolveFailed],
            Self::IdentifierResolved => &[Self::PayloadBuilt],
            Self::PayloadBuilt => &[Self::Applied, Self::SkippedNoTrigger],
            Self::Applied => &[Self::Failed],
            Self::SkippedNoTrigger | Self::SkippedResolveFailed | Self::Failed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether a ticket may stop in this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Applied | Self::SkippedNoTrigger | Self::SkippedResolveFailed | Self::Failed
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::IdentifierResolved => "identifier_resolved",
            Self::PayloadBuilt => "payload_built",
            Self::Applied => "applied",
            Self::SkippedNoTrigger => "skipped_no_trigger",
            Self::SkippedResolveFailed => "skipped_resolve_failed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ReconcileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
