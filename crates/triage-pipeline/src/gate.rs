//! Per-field confidence gate.
//!
//! One comparison, two policies. [`GatePurpose::ApplyUpdate`] decides what
//! may overwrite ticket data; [`GatePurpose::ReportChange`] decides what
//! counts as a change in reporting mode. Both are built from the shared
//! `gate.threshold` today but are separate values so they can diverge.

use std::fmt;

use serde::{Deserialize, Serialize};
use triage_config::GateConfig;
use triage_core::{FieldPrediction, TicketField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePurpose {
    /// Safe to write back to the ticket store.
    ApplyUpdate,
    /// Strong enough to count as a genuine change in reports.
    ReportChange,
}

impl fmt::Display for GatePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ApplyUpdate => "apply_update",
            Self::ReportChange => "report_change",
        })
    }
}

/// Outcome of gating one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Accept,
    BelowThreshold,
    /// Blank label or lookup-miss sentinel; rejected at any confidence.
    Unusable,
}

impl GateDecision {
    #[must_use]
    pub const fn is_accept(self) -> bool {
        matches!(self, Self::Accept)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    threshold: f64,
    purpose: GatePurpose,
}

impl ConfidenceGate {
    #[must_use]
    pub const fn new(threshold: f64, purpose: GatePurpose) -> Self {
        Self { threshold, purpose }
    }

    /// The update-path policy.
    #[must_use]
    pub const fn for_updates(config: &GateConfig) -> Self {
        Self::new(config.threshold, GatePurpose::ApplyUpdate)
    }

    /// The reporting-mode policy.
    #[must_use]
    pub const fn for_reporting(config: &GateConfig) -> Self {
        Self::new(config.threshold, GatePurpose::ReportChange)
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub const fn purpose(&self) -> GatePurpose {
        self.purpose
    }

    /// Classify a prediction without side effects.
    #[must_use]
    pub fn evaluate(&self, prediction: &FieldPrediction) -> GateDecision {
        if !prediction.has_usable_label() {
            GateDecision::Unusable
        } else if prediction.confidence >= self.threshold {
            GateDecision::Accept
        } else {
            GateDecision::BelowThreshold
        }
    }

    /// Whether the prediction passes.
    #[must_use]
    pub fn passes(&self, prediction: &FieldPrediction) -> bool {
        self.evaluate(prediction).is_accept()
    }

    /// Gate `field`, logging the confidence of anything rejected.
    pub fn decide(&self, field: TicketField, prediction: &FieldPrediction) -> GateDecision {
        let decision = self.evaluate(prediction);
        match (decision, self.purpose) {
            (GateDecision::Accept, _) => {}
            (_, GatePurpose::ApplyUpdate) => tracing::info!(
                %field,
                label = %prediction.label,
                confidence = prediction.confidence,
                threshold = self.threshold,
                ?decision,
                "skipping field update"
            ),
            (_, GatePurpose::ReportChange) => tracing::debug!(
                %field,
                confidence = prediction.confidence,
                threshold = self.threshold,
                ?decision,
                "field not counted as change"
            ),
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn gate() -> ConfidenceGate {
        ConfidenceGate::new(0.75, GatePurpose::ApplyUpdate)
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(gate().passes(&FieldPrediction::new("Service Desk", 0.75)));
        assert!(!gate().passes(&FieldPrediction::new("Service Desk", 0.74)));
    }

    #[test]
    fn lookup_miss_never_passes() {
        let miss = FieldPrediction::lookup_miss(1.0);
        assert_eq!(gate().evaluate(&miss), GateDecision::Unusable);
        assert_eq!(
            gate().decide(TicketField::Category, &miss),
            GateDecision::Unusable
        );
    }

    #[test]
    fn blank_label_never_passes() {
        assert_eq!(
            gate().evaluate(&FieldPrediction::new("", 0.99)),
            GateDecision::Unusable
        );
    }

    #[test]
    fn policies_share_threshold_but_not_purpose() {
        let config = GateConfig { threshold: 0.6 };
        let update = ConfidenceGate::for_updates(&config);
        let report = ConfidenceGate::for_reporting(&config);
        assert!((update.threshold() - report.threshold()).abs() < f64::EPSILON);
        assert_eq!(update.purpose(), GatePurpose::ApplyUpdate);
        assert_eq!(report.purpose(), GatePurpose::ReportChange);
        assert_ne!(update, report);
    }

    #[test]
    fn rejected_field_is_logged_with_confidence() {
        let logs = captured_logs(|| {
            let decision = gate().decide(
                TicketField::Category,
                &FieldPrediction::new("Software", 0.40),
            );
            assert_eq!(decision, GateDecision::BelowThreshold);
        });
        assert!(logs.contains("skipping field update"));
        assert!(logs.contains("confidence=0.4"));
        assert!(logs.contains("decision=BelowThreshold"));
    }

    #[test]
    fn accepted_field_is_not_logged() {
        let logs = captured_logs(|| {
            gate().decide(
                TicketField::AssignmentGroup,
                &FieldPrediction::new("Service Desk", 0.95),
            );
        });
        assert!(logs.is_empty());
    }

    #[test]
    fn zero_threshold_accepts_any_usable_label() {
        let gate = ConfidenceGate::new(0.0, GatePurpose::ReportChange);
        assert!(gate.passes(&FieldPrediction::new("x", 0.0)));
        assert!(!gate.passes(&FieldPrediction::lookup_miss(0.0)));
    }
}
