//! # triage-pipeline
//!
//! The confidence-gated prediction-to-update pipeline.
//!
//! ```text
//! TicketBatch ─ normalize ─▶ FeatureVector ─ ModelEnsemble ─▶ TicketPredictions
//!                                                               │
//!                         ConfidenceGate (update policy) ◀──────┤
//!                                   │                            │
//!                          reconcile_batch ─▶ TicketStore         │
//!                                                               ▼
//!                       ChangeObservation ─ summarize ─▶ ReportRow ─▶ ReportStore
//! ```
//!
//! Tickets are processed one at a time and every per-ticket failure is a
//! [`triage_core::PipelineError`] in that ticket's slot, never a reason to
//! stop the batch.

pub mod ensemble;
pub mod error;
pub mod gate;
pub mod normalize;
pub mod priority;
pub mod reconcile;
pub mod report;
pub mod store;

pub use ensemble::{ModelEnsemble, PredictedTicket};
pub use error::ReportError;
pub use gate::{ConfidenceGate, GateDecision, GatePurpose};
pub use normalize::{AcceptedTicket, normalize, normalize_batch};
pub use priority::{PriorityLevel, map_priority};
pub use reconcile::{BatchOutcome, ReconciliationRecord, TicketStore, build_payload, reconcile_batch};
pub use report::{ChangeMode, ChangeObservation, Flag, IncidentChangeRow, ReportRow, summarize};
pub use store::ReportStore;
