//! # triage-core
//!
//! Core types and error types for Triage.
//!
//! This crate provides the foundational types shared across all Triage crates:
//! - Raw ticket records as returned by the ServiceNow Table API
//! - Validated reference fields (`caller_id`, `opened_by`, `assignment_group`)
//! - The fixed-schema feature vector consumed by every classifier
//! - Per-field predictions and the lookup-miss sentinel
//! - The gated partial-update payload
//! - The per-ticket reconcile state machine
//! - Cross-cutting and per-ticket error types

pub mod errors;
pub mod features;
pub mod payload;
pub mod prediction;
pub mod state;
pub mod ticket;

pub use errors::{CoreError, PipelineError};
pub use features::{FeatureValue, FeatureVector};
pub use payload::{ACTOR_FIELD, UpdatePayload};
pub use prediction::{FieldPrediction, LOOKUP_MISS, TicketField, TicketPredictions};
pub use state::ReconcileState;
pub use ticket::{Reference, TicketBatch, TicketRecord};
