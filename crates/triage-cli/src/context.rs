use anyhow::Context;
use triage_config::TriageConfig;
use triage_pipeline::{ConfidenceGate, ModelEnsemble, ReportStore};
use triage_servicenow::ServiceNowClient;

/// Configuration plus constructors for the resources commands need.
///
/// Models and the ServiceNow client are built on demand so `triage report`
/// works without either.
pub struct AppContext {
    pub config: TriageConfig,
}

impl AppContext {
    pub const fn new(config: TriageConfig) -> Self {
        Self { config }
    }

    pub fn servicenow(&self) -> anyhow::Result<ServiceNowClient> {
        let section = self.config.require_servicenow()?;
        ServiceNowClient::from_config(section).context("failed to build ServiceNow client")
    }

    pub fn ensemble(&self) -> anyhow::Result<ModelEnsemble> {
        ModelEnsemble::load(&self.config.models).context("failed to load model artifacts")
    }

    pub const fn update_gate(&self) -> ConfidenceGate {
        ConfidenceGate::for_updates(&self.config.gate)
    }

    pub const fn report_gate(&self) -> ConfidenceGate {
        ConfidenceGate::for_reporting(&self.config.gate)
    }

    pub fn summary_store(&self) -> ReportStore {
        ReportStore::new(&self.config.report.summary_path)
    }

    pub fn changes_store(&self) -> ReportStore {
        ReportStore::new(&self.config.report.changes_path)
    }
}

/// Warn about configuration gaps that limit what commands can do.
pub fn warn_unconfigured(config: &TriageConfig) {
    if !config.servicenow.is_configured() {
        tracing::warn!(
            "ServiceNow is not configured; commands can only read --input dumps. \
             Set TRIAGE_SERVICENOW__INSTANCE_URL, TRIAGE_SERVICENOW__USER and \
             TRIAGE_SERVICENOW__PASSWORD."
        );
    }
    if !config.models.assignment_group.exists() {
        tracing::warn!(
            path = %config.models.assignment_group.display(),
            "assignment group model not found"
        );
    }
}
