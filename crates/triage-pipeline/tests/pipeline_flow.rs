//! End-to-end: dump text → predictions → reconcile → report stores.

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use triage_core::{FeatureVector, ReconcileState, TicketBatch, UpdatePayload};
use triage_models::{Classifier, LookupRow, LookupTable, ModelError};
use triage_pipeline::{
    ChangeObservation, ConfidenceGate, GatePurpose, IncidentChangeRow, ModelEnsemble, ReportRow,
    ReportStore, TicketStore, reconcile_batch, summarize,
};
use triage_servicenow::ServiceNowError;

const DUMP: &str = r#"Response for incident API: {
  "result": [
    {
      "number": "INC100001",
      "impact": "3",
      "urgency": "3",
      "subcategory": "",
      "category": "",
      "opened_at": "2025-03-04 10:00:00",
      "caller_id": {"value": "user@example.com"},
      "opened_by": {"value": "user@example.com"}
    },
    {
      "number": "INC100002",
      "category": "Network",
      "caller_id": {"value": "ops@example.com"},
      "opened_by": {"value": "ops@example.com"}
    },
    {
      "number": "INC100003",
      "caller_id": "someone@example.com",
      "opened_by": {"value": "someone@example.com"}
    }
  ]
}"#;

/// Confident about software tickets, unsure about network ones.
struct ByCategory {
    classes: Vec<String>,
}

impl ByCategory {
    fn boxed(classes: [&str; 2]) -> Box<dyn Classifier> {
        Box::new(Self {
            classes: classes.iter().map(ToString::to_string).collect(),
        })
    }
}

impl Classifier for ByCategory {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        Ok(if features.category == "network" {
            vec![0.4, 0.6]
        } else {
            vec![0.95, 0.05]
        })
    }
}

#[derive(Default)]
struct RecordingStore {
    calls: Mutex<Vec<String>>,
}

impl TicketStore for RecordingStore {
    async fn resolve_sys_id(&self, number: &str) -> Result<Option<String>, ServiceNowError> {
        Ok(Some(number.to_lowercase()))
    }

    async fn apply_update(
        &self,
        sys_id: &str,
        payload: &UpdatePayload,
    ) -> Result<Value, ServiceNowError> {
        self.calls.lock().unwrap().push(sys_id.to_string());
        Ok(json!({"result": serde_json::to_value(payload).unwrap()}))
    }
}

fn lookup(rows: &[(&str, &str)]) -> LookupTable {
    LookupTable::from_rows(rows.iter().map(|(text, value)| LookupRow {
        text: (*text).into(),
        value: (*value).into(),
    }))
}

fn ensemble() -> ModelEnsemble {
    ModelEnsemble::new(
        ByCategory::boxed(["Service Desk", "Network Ops"]),
        ByCategory::boxed(["SW", "NET"]),
        ByCategory::boxed(["EMAIL", "VPN"]),
        lookup(&[("sw", "Software"), ("net", "Network")]),
        lookup(&[("email", "Email")]),
    )
}

fn as_of() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 5)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn dump_to_reports() {
    let batch = TicketBatch::from_response_text(DUMP).expect("dump parses");
    assert_eq!(batch.len(), 3);

    let predicted: Vec<_> = ensemble()
        .predict_batch(&batch, as_of())
        .into_iter()
        .collect::<Result<_, _>>()
        .expect("inference succeeds");
    let ids: Vec<_> = predicted
        .iter()
        .map(|p| p.predictions.incident_id.as_str())
        .collect();
    assert_eq!(ids, ["INC100001", "INC100002"]);

    let first = &predicted[0].predictions;
    assert_eq!(first.priority.label, "p3 - medium");
    assert!((first.priority.confidence - 1.0).abs() < f64::EPSILON);

    let predictions: Vec<_> = predicted.iter().map(|p| p.predictions.clone()).collect();
    let store = RecordingStore::default();
    let update_gate = ConfidenceGate::new(0.75, GatePurpose::ApplyUpdate);
    let outcome = reconcile_batch(&store, &update_gate, "AI_OPS DEV", &predictions).await;

    assert_eq!(outcome.count_in(ReconcileState::Applied), 1);
    assert_eq!(outcome.count_in(ReconcileState::SkippedNoTrigger), 1);
    assert_eq!(*store.calls.lock().unwrap(), ["inc100001"]);
    assert_eq!(
        outcome.last_response.unwrap()["result"],
        json!({
            "sys_updated_by": "AI_OPS DEV",
            "assignment_group": "Service Desk",
            "category": "Software",
            "subcategory": "Email",
            "priority": "p3 - medium"
        })
    );

    let report_gate = ConfidenceGate::new(0.75, GatePurpose::ReportChange);
    let processing_date = as_of().date();
    let observations: Vec<_> = predictions
        .iter()
        .map(|p| ChangeObservation::from_confidence(p, &report_gate, processing_date))
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let summary = ReportStore::new(dir.path().join("reports/summary.jsonl"));
    summary.append(&summarize(&observations)).unwrap();

    let rows: Vec<ReportRow> = summary.load().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
    assert_eq!(rows[0].total_changed, 4);
    // INC100002 has no opened_at; its lookups miss or fall short.
    assert_eq!(rows[1].date, processing_date);
    assert_eq!(rows[1].total_changed, 0);
}

#[test]
fn stores_append_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let store = ReportStore::new(dir.path().join("incident_changes.jsonl"));
    assert!(store.load::<IncidentChangeRow>().unwrap().is_empty());

    let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
    let observation = |id: &str, changed: bool| ChangeObservation {
        incident_id: id.into(),
        date,
        priority: changed,
        category: false,
        subcategory: false,
        assignment_group: changed,
        mode: triage_pipeline::ChangeMode::Comparison,
    };

    let first = [IncidentChangeRow::from(&observation("INC1", true))];
    let second = [IncidentChangeRow::from(&observation("INC2", false))];
    assert_eq!(store.append(&first).unwrap(), 1);
    assert_eq!(store.append(&second).unwrap(), 1);
    assert_eq!(store.append::<IncidentChangeRow>(&[]).unwrap(), 0);

    let rows: Vec<IncidentChangeRow> = store.load().unwrap();
    assert_eq!(rows, [first[0].clone(), second[0].clone()]);
    assert_eq!(rows[0].global_change, 2);
}

#[test]
fn corrupt_store_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.jsonl");
    std::fs::write(&path, "{\"date\": \"not a date\"}\n").unwrap();
    let err = ReportStore::new(&path).load::<ReportRow>().unwrap_err();
    assert!(matches!(err, triage_pipeline::ReportError::Parse { .. }));
}
