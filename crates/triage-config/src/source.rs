//! Ticket source and update settings.

use serde::{Deserialize, Serialize};

const fn default_window_minutes() -> u32 {
    10
}

fn default_actor() -> String {
    "AI_OPS DEV".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Poll window: fetch active incidents created in the last N minutes.
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,

    /// Result cap (`sysparm_limit`). Unlimited when unset.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            window_minutes: default_window_minutes(),
            limit: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateConfig {
    /// Written as `sys_updated_by` on every update payload.
    #[serde(default = "default_actor")]
    pub actor: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            actor: default_actor(),
        }
    }
}
