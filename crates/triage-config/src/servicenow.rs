//! ServiceNow instance configuration.

use serde::{Deserialize, Serialize};

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceNowConfig {
    /// Table API base URL, ending in `/` (e.g.
    /// `https://dev12345.service-now.com/api/now/table/`).
    #[serde(default)]
    pub instance_url: String,

    /// Basic-auth user.
    #[serde(default)]
    pub user: String,

    /// Basic-auth password.
    #[serde(default)]
    pub password: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceNowConfig {
    fn default() -> Self {
        Self {
            instance_url: String::new(),
            user: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServiceNowConfig {
    /// Keys that must be set before any API call, in the order they appear
    /// in the config file.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("instance_url", &self.instance_url),
            ("user", &self.user),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect()
    }

    pub fn is_configured(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// The base URL with a guaranteed trailing slash.
    pub fn table_base(&self) -> String {
        if self.instance_url.ends_with('/') {
            self.instance_url.clone()
        } else {
            format!("{}/", self.instance_url)
        }
    }
}
