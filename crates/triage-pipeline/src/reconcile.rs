//! Gated predictions → partial updates on the ticket store.
//!
//! Each ticket walks the [`ReconcileState`] machine on its own. A failure on
//! one ticket is recorded in its slot of [`BatchOutcome::results`] and the
//! loop moves on.

use serde::Serialize;
use serde_json::Value;
use triage_core::{PipelineError, ReconcileState, TicketField, TicketPredictions, UpdatePayload};
use triage_servicenow::{ServiceNowClient, ServiceNowError};

use crate::gate::ConfidenceGate;

/// The two calls the reconciler makes against the ticket store.
#[allow(async_fn_in_trait)]
pub trait TicketStore {
    /// Durable identifier for a business number, or `None` if unknown.
    async fn resolve_sys_id(&self, number: &str) -> Result<Option<String>, ServiceNowError>;

    /// Apply a partial update and return the store's response.
    async fn apply_update(
        &self,
        sys_id: &str,
        payload: &UpdatePayload,
    ) -> Result<Value, ServiceNowError>;
}

impl TicketStore for ServiceNowClient {
    async fn resolve_sys_id(&self, number: &str) -> Result<Option<String>, ServiceNowError> {
        Self::resolve_sys_id(self, number).await
    }

    async fn apply_update(
        &self,
        sys_id: &str,
        payload: &UpdatePayload,
    ) -> Result<Value, ServiceNowError> {
        Self::apply_update(self, sys_id, payload).await
    }
}

/// What happened to one ticket that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationRecord {
    pub incident_id: String,
    pub sys_id: String,
    pub state: ReconcileState,
    /// Fields written (or that would have been written, for
    /// [`ReconcileState::SkippedNoTrigger`]).
    pub gated_fields: Vec<TicketField>,
    /// Fields the gate rejected.
    pub skipped_fields: Vec<TicketField>,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// One entry per input ticket, in input order.
    pub results: Vec<Result<ReconciliationRecord, PipelineError>>,
    /// Body of the most recent successful update, if any.
    pub last_response: Option<Value>,
}

impl BatchOutcome {
    #[must_use]
    pub fn count_in(&self, state: ReconcileState) -> usize {
        self.results
            .iter()
            .filter(|r| match r {
                Ok(record) => record.state == state,
                Err(error) => error.terminal_state() == Some(state),
            })
            .count()
    }
}

/// Build the gated payload for one ticket.
#[must_use]
pub fn build_payload(
    gate: &ConfidenceGate,
    actor: &str,
    predictions: &TicketPredictions,
) -> UpdatePayload {
    let mut payload = UpdatePayload::new(actor);
    for (field, prediction) in predictions.fields() {
        if gate.decide(field, prediction).is_accept() {
            payload.insert(field, prediction.label.clone());
        }
    }
    payload
}

/// Reconcile every ticket in turn.
///
/// Exactly one update call is made per ticket whose payload carries the
/// assignment group; none for any other ticket.
pub async fn reconcile_batch<S: TicketStore>(
    store: &S,
    gate: &ConfidenceGate,
    actor: &str,
    predictions: &[TicketPredictions],
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for ticket in predictions {
        let result = match reconcile_ticket(store, gate, actor, ticket).await {
            Ok((record, response)) => {
                if response.is_some() {
                    outcome.last_response = response;
                }
                Ok(record)
            }
            Err(error) => {
                tracing::warn!(
                    incident = error.incident().unwrap_or_default(),
                    state = ?error.terminal_state(),
                    %error,
                    "ticket not updated"
                );
                Err(error)
            }
        };
        outcome.results.push(result);
    }
    tracing::info!(
        tickets = predictions.len(),
        applied = outcome.count_in(ReconcileState::Applied),
        skipped_no_trigger = outcome.count_in(ReconcileState::SkippedNoTrigger),
        skipped_resolve = outcome.count_in(ReconcileState::SkippedResolveFailed),
        failed = outcome.count_in(ReconcileState::Failed),
        "reconciled batch"
    );
    outcome
}

async fn reconcile_ticket<S: TicketStore>(
    store: &S,
    gate: &ConfidenceGate,
    actor: &str,
    ticket: &TicketPredictions,
) -> Result<(ReconciliationRecord, Option<Value>), PipelineError> {
    let incident = ticket.incident_id.trim();
    if incident.is_empty() {
        return Err(PipelineError::MissingIdentifier);
    }
    let mut state = ReconcileState::Received;

    let sys_id = match store.resolve_sys_id(incident).await {
        Ok(Some(sys_id)) => sys_id,
        Ok(None) => {
            return Err(PipelineError::ResolveFailure {
                incident: incident.to_string(),
                reason: "no incident with this number".into(),
            });
        }
        Err(error) => {
            return Err(PipelineError::ResolveFailure {
                incident: incident.to_string(),
                reason: error.to_string(),
            });
        }
    };
    advance(&mut state, ReconcileState::IdentifierResolved);

    let payload = build_payload(gate, actor, ticket);
    advance(&mut state, ReconcileState::PayloadBuilt);

    let gated_fields: Vec<TicketField> = payload.fields().map(|(field, _)| field).collect();
    let skipped_fields = TicketField::ALL
        .into_iter()
        .filter(|f| !payload.contains(*f))
        .collect();
    let mut record = ReconciliationRecord {
        incident_id: incident.to_string(),
        sys_id,
        state,
        gated_fields,
        skipped_fields,
    };

    if !payload.has_trigger() {
        advance(&mut record.state, ReconcileState::SkippedNoTrigger);
        tracing::info!(incident, "no confident assignment group, ticket left unchanged");
        return Ok((record, None));
    }

    advance(&mut record.state, ReconcileState::Applied);
    let response = store
        .apply_update(&record.sys_id, &payload)
        .await
        .map_err(|error| update_error(incident, error))?;
    tracing::info!(incident, sys_id = %record.sys_id, fields = payload.len(), "ticket updated");
    Ok((record, Some(response)))
}

fn update_error(incident: &str, error: ServiceNowError) -> PipelineError {
    match error {
        ServiceNowError::Api { status, body } => PipelineError::NonSuccessStatus {
            incident: incident.to_string(),
            status,
            body,
        },
        ServiceNowError::RateLimited { .. } => PipelineError::NonSuccessStatus {
            incident: incident.to_string(),
            status: 429,
            body: error.to_string(),
        },
        other => PipelineError::Transport {
            incident: incident.to_string(),
            source: Box::new(other),
        },
    }
}

fn advance(state: &mut ReconcileState, next: ReconcileState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal transition {state} -> {next}"
    );
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use triage_core::FieldPrediction;

    use crate::gate::{GateDecision, GatePurpose};

    /// In-memory store that records every update call.
    #[derive(Default)]
    struct FakeStore {
        unknown: Vec<&'static str>,
        rejecting: Vec<&'static str>,
        updates: Mutex<Vec<(String, Value)>>,
    }

    impl FakeStore {
        fn update_calls(&self) -> Vec<(String, Value)> {
            self.updates.lock().unwrap().clone()
        }
    }

    impl TicketStore for FakeStore {
        async fn resolve_sys_id(&self, number: &str) -> Result<Option<String>, ServiceNowError> {
            if self.unknown.iter().any(|n| *n == number) {
                Ok(None)
            } else {
                Ok(Some(format!("sys-{number}")))
            }
        }

        async fn apply_update(
            &self,
            sys_id: &str,
            payload: &UpdatePayload,
        ) -> Result<Value, ServiceNowError> {
            let body = serde_json::to_value(payload).unwrap();
            self.updates
                .lock()
                .unwrap()
                .push((sys_id.to_string(), body.clone()));
            if self.rejecting.iter().any(|n| sys_id.ends_with(*n)) {
                return Err(ServiceNowError::Api {
                    status: 403,
                    body: "ACL denied".into(),
                });
            }
            Ok(json!({"result": body}))
        }
    }

    fn gate() -> ConfidenceGate {
        ConfidenceGate::new(0.75, GatePurpose::ApplyUpdate)
    }

    fn ticket(id: &str, group_conf: f64, category_conf: f64) -> TicketPredictions {
        TicketPredictions {
            incident_id: id.into(),
            opened_at: None,
            assignment_group: FieldPrediction::new("Service Desk", group_conf),
            category: FieldPrediction::new("Software", category_conf),
            subcategory: FieldPrediction::lookup_miss(1.0),
            priority: FieldPrediction::new("p3 - medium", 0.5),
        }
    }

    #[test]
    fn payload_keeps_only_confident_fields() {
        let predictions = ticket("INC1", 0.95, 0.40);
        assert_eq!(
            gate().decide(TicketField::Category, &predictions.category),
            GateDecision::BelowThreshold
        );
        assert_eq!(
            gate().decide(TicketField::Subcategory, &predictions.subcategory),
            GateDecision::Unusable
        );

        let payload = build_payload(&gate(), "AI_OPS DEV", &predictions);
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.get(TicketField::AssignmentGroup), Some("Service Desk"));
        assert!(!payload.contains(TicketField::Category));
        assert!(!payload.contains(TicketField::Subcategory));
        assert_eq!(payload.actor(), "AI_OPS DEV");
    }

    #[tokio::test]
    async fn applies_ticket_with_confident_group() {
        let store = FakeStore::default();
        let outcome = reconcile_batch(&store, &gate(), "AI_OPS DEV", &[ticket("INC1", 0.9, 0.8)]).await;

        let record = outcome.results[0].as_ref().unwrap();
        assert_eq!(record.state, ReconcileState::Applied);
        assert_eq!(record.sys_id, "sys-INC1");
        assert_eq!(
            record.gated_fields,
            [TicketField::AssignmentGroup, TicketField::Category]
        );
        assert_eq!(
            store.update_calls(),
            [(
                "sys-INC1".to_string(),
                json!({
                    "sys_updated_by": "AI_OPS DEV",
                    "assignment_group": "Service Desk",
                    "category": "Software"
                })
            )]
        );
        assert!(outcome.last_response.is_some());
    }

    #[tokio::test]
    async fn no_group_means_no_update_call() {
        let store = FakeStore::default();
        let outcome = reconcile_batch(&store, &gate(), "AI_OPS DEV", &[ticket("INC1", 0.5, 0.99)]).await;

        let record = outcome.results[0].as_ref().unwrap();
        assert_eq!(record.state, ReconcileState::SkippedNoTrigger);
        assert_eq!(record.gated_fields, [TicketField::Category]);
        assert!(store.update_calls().is_empty());
        assert!(outcome.last_response.is_none());
    }

    #[tokio::test]
    async fn unresolved_number_is_skipped() {
        let store = FakeStore {
            unknown: vec!["INC404"],
            ..Default::default()
        };
        let outcome = reconcile_batch(&store, &gate(), "AI_OPS DEV", &[ticket("INC404", 0.9, 0.9)]).await;

        assert!(matches!(
            outcome.results[0],
            Err(PipelineError::ResolveFailure { .. })
        ));
        assert_eq!(outcome.count_in(ReconcileState::SkippedResolveFailed), 1);
        assert!(store.update_calls().is_empty());
    }

    #[tokio::test]
    async fn blank_identifier_is_skipped_before_resolve() {
        let store = FakeStore::default();
        let outcome = reconcile_batch(&store, &gate(), "AI_OPS DEV", &[ticket("  ", 0.9, 0.9)]).await;
        assert!(matches!(
            outcome.results[0],
            Err(PipelineError::MissingIdentifier)
        ));
        assert!(store.update_calls().is_empty());
    }

    #[tokio::test]
    async fn failed_update_does_not_stop_the_batch() {
        let store = FakeStore {
            rejecting: vec!["INC2"],
            ..Default::default()
        };
        let tickets = [
            ticket("INC1", 0.9, 0.9),
            ticket("INC2", 0.9, 0.9),
            ticket("INC3", 0.9, 0.9),
        ];
        let outcome = reconcile_batch(&store, &gate(), "AI_OPS DEV", &tickets).await;

        assert_eq!(outcome.results.len(), 3);
        assert!(matches!(
            &outcome.results[1],
            Err(PipelineError::NonSuccessStatus { status: 403, body, .. }) if body == "ACL denied"
        ));
        assert_eq!(outcome.count_in(ReconcileState::Applied), 2);
        assert_eq!(outcome.count_in(ReconcileState::Failed), 1);
        assert_eq!(store.update_calls().len(), 3);
        assert_eq!(
            outcome.last_response.unwrap()["result"]["sys_updated_by"],
            json!("AI_OPS DEV")
        );
    }
}
