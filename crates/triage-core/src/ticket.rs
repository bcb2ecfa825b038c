//! Raw ticket records and validated reference fields.
//!
//! A [`TicketRecord`] mirrors one element of the ServiceNow Table API
//! `result` array. Every field is optional: the API omits fields that are not
//! projected, and dumps taken from older instances use different shapes
//! (strings vs `{ "link", "value" }` objects). Interpretation happens in the
//! feature normalizer, never here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CoreError;

/// One incident as returned by the ticket source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Business number (e.g. `INC0010023`). Required to address updates.
    pub number: Option<Value>,
    pub subcategory: Option<Value>,
    pub category: Option<Value>,
    pub priority: Option<Value>,
    /// Configuration item.
    pub cmdb_ci: Option<Value>,
    pub location: Option<Value>,
    pub business_unit: Option<Value>,
    /// Legal entity.
    pub company: Option<Value>,
    pub team_classification: Option<Value>,
    /// Reference field: `{ "value": "<sys_id or email>" }`.
    pub caller_id: Option<Value>,
    /// Reference field: `{ "value": "<sys_id or email>" }`.
    pub opened_by: Option<Value>,
    /// Reference field for the currently assigned group.
    pub assignment_group: Option<Value>,
    /// `YYYY-MM-DD HH:MM:SS` in the instance timezone.
    pub opened_at: Option<Value>,
    /// 1 (high) to 4 (low); the API usually sends these as strings.
    pub impact: Option<Value>,
    pub urgency: Option<Value>,
    /// Task-level number used by some reports instead of `number`.
    pub task_effective_number: Option<Value>,

    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TicketRecord {
    /// The incident business number, if present and non-empty.
    #[must_use]
    pub fn incident_number(&self) -> Option<String> {
        self.number.as_ref().and_then(scalar_text)
    }

    /// The number used to match a ticket against predictions in KPI reports.
    ///
    /// Prefers `task_effective_number`, falling back to `number`.
    #[must_use]
    pub fn effective_number(&self) -> Option<String> {
        self.task_effective_number
            .as_ref()
            .and_then(scalar_text)
            .or_else(|| self.incident_number())
    }
}

/// Render a JSON scalar as trimmed text. Returns `None` for null, empty
/// strings, objects and arrays.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

// ── Reference ──────────────────────────────────────────────────────

/// A validated ServiceNow reference field.
///
/// The API encodes references as `{ "link": "...", "value": "..." }`. A
/// reference is valid only when the raw value is an object that carries a
/// `value` key; the key's content may itself be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub has_value: bool,
    pub value: String,
}

impl Reference {
    /// Validate a raw reference field.
    ///
    /// Anything other than an object with a `value` key yields
    /// `has_value == false`. That includes bare strings, which older
    /// dumps use for display values.
    #[must_use]
    pub fn from_raw(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::Object(map)) => map.get("value").map_or_else(Self::default, |inner| Self {
                has_value: true,
                value: scalar_text(inner).unwrap_or_default(),
            }),
            _ => Self::default(),
        }
    }
}

// ── Batch ──────────────────────────────────────────────────────────

/// The `{ "result": [...] }` envelope returned by list queries.
///
/// A single-object `result` (as returned by update calls) is accepted and
/// wrapped into a one-element batch. Elements that are not ticket objects
/// are dropped with a warning and counted in `rejected`; the rest of the
/// batch survives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBatch")]
pub struct TicketBatch {
    pub result: Vec<TicketRecord>,
    #[serde(skip)]
    pub rejected: usize,
}

impl TicketBatch {
    /// Parse a saved API response dump.
    ///
    /// Dumps are often prefixed with a label line (`Response for incident
    /// API: {...}`), so parsing starts at the first `{`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if no JSON object is found or the object
    /// is not a valid ticket envelope. This is fatal for the run since no
    /// tickets can be recovered.
    pub fn from_response_text(text: &str) -> Result<Self, CoreError> {
        let start = text
            .find('{')
            .ok_or_else(|| CoreError::Parse("no JSON object found in ticket payload".into()))?;
        serde_json::from_str(&text[start..])
            .map_err(|e| CoreError::Parse(format!("invalid ticket payload: {e}")))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.result.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}

#[derive(Deserialize)]
struct RawBatch {
    #[serde(default)]
    result: Option<Value>,
}

impl From<RawBatch> for TicketBatch {
    fn from(raw: RawBatch) -> Self {
        let elements = match raw.result {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(single) => vec![single],
        };

        let mut batch = Self::default();
        for (index, element) in elements.into_iter().enumerate() {
            match serde_json::from_value::<TicketRecord>(element) {
                Ok(record) => batch.result.push(record),
                Err(error) => {
                    tracing::warn!(index, %error, "skipping malformed ticket element");
                    batch.rejected += 1;
                }
            }
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reference_requires_object_with_value_key() {
        let ok = Reference::from_raw(Some(&json!({"link": "x", "value": "abc123"})));
        assert!(ok.has_value);
        assert_eq!(ok.value, "abc123");

        let bare = Reference::from_raw(Some(&json!("user@example.com")));
        assert!(!bare.has_value);

        let no_key = Reference::from_raw(Some(&json!({"link": "x"})));
        assert!(!no_key.has_value);

        assert!(!Reference::from_raw(None).has_value);
    }

    #[test]
    fn reference_with_null_value_is_still_valid() {
        let r = Reference::from_raw(Some(&json!({"value": null})));
        assert!(r.has_value);
        assert!(r.value.is_empty());
    }

    #[test]
    fn incident_number_ignores_blank() {
        let record = TicketRecord {
            number: Some(json!("   ")),
            ..Default::default()
        };
        assert_eq!(record.incident_number(), None);
    }

    #[test]
    fn effective_number_prefers_task_number() {
        let record: TicketRecord = serde_json::from_value(json!({
            "number": "INC1",
            "task_effective_number": "INC2"
        }))
        .unwrap();
        assert_eq!(record.effective_number().as_deref(), Some("INC2"));
    }

    #[test]
    fn unknown_fields_are_kept() {
        let record: TicketRecord = serde_json::from_value(json!({
            "number": "INC1",
            "short_description": "VPN down"
        }))
        .unwrap();
        assert_eq!(record.extra.get("short_description"), Some(&json!("VPN down")));
    }

    #[test]
    fn batch_parses_dump_with_prefix() {
        let text = "Response for incident API: {\"result\": [{\"number\": \"INC1\"}]}";
        let batch = TicketBatch::from_response_text(text).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.result[0].incident_number().as_deref(), Some("INC1"));
    }

    #[test]
    fn batch_wraps_single_result_object() {
        let batch = TicketBatch::from_response_text(r#"{"result": {"number": "INC9"}}"#).unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn null_result_is_an_empty_batch() {
        let batch = TicketBatch::from_response_text(r#"{"result": null}"#).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.rejected, 0);
    }

    #[test]
    fn batch_without_json_is_fatal() {
        let err = TicketBatch::from_response_text("Status: 500").unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[test]
    fn batch_with_truncated_json_is_fatal() {
        let err = TicketBatch::from_response_text("{\"result\": [").unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }
}
