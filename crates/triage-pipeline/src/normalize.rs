//! Raw ticket record → [`FeatureVector`].
//!
//! Text fields are trimmed and lowercased; anything missing, empty or falsy
//! takes the column default. The two reference fields are the exception:
//! a ticket whose `caller_id` or `opened_by` is not a `{ "value": ... }`
//! object is rejected outright.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde_json::Value;
use triage_core::{FeatureVector, PipelineError, Reference, TicketBatch, TicketRecord};

/// Format of `opened_at` as sent by the Table API.
pub const OPENED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DEFAULT_UNKNOWN: &str = "unknown";
pub const DEFAULT_PRIORITY: &str = "p3 - medium";
pub const DEFAULT_CONFIGURATION_ITEM: &str = "generic";
pub const DEFAULT_BUSINESS_UNIT: &str = "wood - operations";
pub const DEFAULT_LEGAL_ENTITY: &str = "wood group psn australia pty limited";
pub const DEFAULT_TEAM_CLASSIFICATION: &str = "gsd";

/// A ticket that passed normalization, with the record it came from.
#[derive(Debug, Clone)]
pub struct AcceptedTicket<'a> {
    pub record: &'a TicketRecord,
    pub features: FeatureVector,
}

/// Build the feature vector for one ticket.
///
/// `as_of` stands in for `opened_at` when the ticket has none or it does not
/// parse.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedInput`] if `caller_id` or `opened_by`
/// is not a reference object with a `value` key.
pub fn normalize(record: &TicketRecord, as_of: NaiveDateTime) -> Result<FeatureVector, PipelineError> {
    let caller = require_reference(record, record.caller_id.as_ref(), "caller_id")?;
    let opener = require_reference(record, record.opened_by.as_ref(), "opened_by")?;
    let opened = parse_opened_at(record).unwrap_or(as_of);

    Ok(FeatureVector {
        subcategory: normalize_text(record.subcategory.as_ref(), DEFAULT_UNKNOWN),
        category: normalize_text(record.category.as_ref(), DEFAULT_UNKNOWN),
        priority: normalize_text(record.priority.as_ref(), DEFAULT_PRIORITY),
        configuration_item: normalize_text(record.cmdb_ci.as_ref(), DEFAULT_CONFIGURATION_ITEM),
        location: normalize_text(record.location.as_ref(), DEFAULT_UNKNOWN),
        business_unit: normalize_text(record.business_unit.as_ref(), DEFAULT_BUSINESS_UNIT),
        legal_entity: normalize_text(record.company.as_ref(), DEFAULT_LEGAL_ENTITY),
        reported_by: reference_text(&caller),
        opened_by: reference_text(&opener),
        hour: opened.hour(),
        week_day: opened.weekday().num_days_from_monday(),
        opened_month: opened.month(),
        opened_year: opened.year(),
        team_classification: normalize_text(
            record.team_classification.as_ref(),
            DEFAULT_TEAM_CLASSIFICATION,
        ),
    })
}

/// Normalize every ticket in a batch, dropping (and logging) rejects.
#[must_use]
pub fn normalize_batch(batch: &TicketBatch, as_of: NaiveDateTime) -> Vec<AcceptedTicket<'_>> {
    let mut accepted = Vec::with_capacity(batch.len());
    for record in &batch.result {
        match normalize(record, as_of) {
            Ok(features) => accepted.push(AcceptedTicket { record, features }),
            Err(error) => tracing::warn!(
                incident = error.incident().unwrap_or_default(),
                %error,
                "skipping ticket"
            ),
        }
    }
    if accepted.len() < batch.len() {
        tracing::info!(
            accepted = accepted.len(),
            rejected = batch.len() - accepted.len(),
            "normalized batch"
        );
    }
    accepted
}

/// The ticket's own `opened_at`, if present and well-formed.
#[must_use]
pub fn parse_opened_at(record: &TicketRecord) -> Option<NaiveDateTime> {
    let Some(Value::String(raw)) = record.opened_at.as_ref() else {
        return None;
    };
    NaiveDateTime::parse_from_str(raw.trim(), OPENED_AT_FORMAT).ok()
}

/// Trimmed, lowercased text for a raw field, or `default` when the value is
/// absent, empty or falsy (`0`, `false`, `{}`, `[]`).
#[must_use]
pub fn normalize_text(value: Option<&Value>, default: &str) -> String {
    let text = match value {
        None | Some(Value::Null | Value::Bool(false)) => None,
        Some(Value::String(s)) => Some(s.trim().to_lowercase()),
        Some(Value::Bool(true)) => Some("true".to_string()),
        Some(Value::Number(n)) => {
            let is_zero = n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON);
            (!is_zero).then(|| n.to_string())
        }
        Some(Value::Array(items)) if items.is_empty() => None,
        Some(Value::Object(map)) if map.is_empty() => None,
        Some(other) => Some(other.to_string().to_lowercase()),
    };
    text.filter(|t| !t.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn require_reference(
    record: &TicketRecord,
    raw: Option<&Value>,
    field: &'static str,
) -> Result<Reference, PipelineError> {
    let reference = Reference::from_raw(raw);
    if reference.has_value {
        Ok(reference)
    } else {
        Err(PipelineError::MalformedInput {
            incident: record.incident_number().unwrap_or_default(),
            field,
        })
    }
}

fn reference_text(reference: &Reference) -> String {
    let text = reference.value.trim().to_lowercase();
    if text.is_empty() {
        DEFAULT_UNKNOWN.to_string()
    } else {
        text
    }
}
