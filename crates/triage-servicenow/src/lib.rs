//! # triage-servicenow
//!
//! HTTP client for the ServiceNow Table API.
//!
//! Covers the three calls the pipeline needs against the `incident` table:
//! - list incidents matching an encoded query ([`TicketQuery`])
//! - resolve a business number (`INC0010023`) to its durable `sys_id`
//! - apply a partial update to one incident
//!
//! All calls use HTTP basic auth and JSON bodies.

pub mod incidents;
pub mod query;

mod error;
mod http;

pub use error::ServiceNowError;
pub use query::{IncidentState, TicketFilter, TicketQuery};

use std::time::Duration;

use triage_config::ServiceNowConfig;

/// The table every call in this crate targets.
pub const INCIDENT_TABLE: &str = "incident";

// ── Client ─────────────────────────────────────────────────────────

/// Client bound to one ServiceNow instance and credential pair.
pub struct ServiceNowClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

impl ServiceNowClient {
    /// Build a client from the `servicenow` config section.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceNowError::Http`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn from_config(config: &ServiceNowConfig) -> Result<Self, ServiceNowError> {
        Self::new(
            config.table_base(),
            config.user.clone(),
            config.password.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Build a client for `base_url` (the Table API root, ending in `/`).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceNowError::Http`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceNowError> {
        let http = reqwest::Client::builder()
            .user_agent("triage/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            user: user.into(),
            password: password.into(),
        })
    }

    /// `{base}incident`.
    #[must_use]
    pub fn table_url(&self) -> String {
        format!("{}{INCIDENT_TABLE}", self.base_url)
    }

    /// `{base}incident/{sys_id}`.
    #[must_use]
    pub fn record_url(&self, sys_id: &str) -> String {
        format!("{}/{}", self.table_url(), urlencoding::encode(sys_id))
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .basic_auth(&self.user, Some(&self.password))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    fn put(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .put(url)
            .basic_auth(&self.user, Some(&self.password))
            .header(reqwest::header::ACCEPT, "application/json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ServiceNowClient {
        ServiceNowClient::new(
            "https://dev1.service-now.com/api/now/table/",
            "admin",
            "secret",
            Duration::from_secs(5),
        )
        .expect("client builds")
    }

    #[test]
    fn builds_table_and_record_urls() {
        let c = client();
        assert_eq!(
            c.table_url(),
            "https://dev1.service-now.com/api/now/table/incident"
        );
        assert_eq!(
            c.record_url("9d385017c611228701d22104cc95c371"),
            "https://dev1.service-now.com/api/now/table/incident/9d385017c611228701d22104cc95c371"
        );
    }

    #[test]
    fn record_url_escapes_path_segment() {
        assert!(client().record_url("a/b").ends_with("/incident/a%2Fb"));
    }

    #[test]
    fn from_config_normalizes_base() {
        let config = ServiceNowConfig {
            instance_url: "https://dev1.service-now.com/api/now/table".into(),
            user: "u".into(),
            password: "p".into(),
            timeout_secs: 5,
        };
        let c = ServiceNowClient::from_config(&config).expect("client builds");
        assert_eq!(
            c.table_url(),
            "https://dev1.service-now.com/api/now/table/incident"
        );
    }
}
