//! # triage-config
//!
//! Layered configuration loading for Triage using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TRIAGE_*` prefix, `__` as separator)
//! 2. Project-level `.triage/config.toml`
//! 3. User-level `~/.config/triage/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TRIAGE_SERVICENOW__USER` -> `servicenow.user`,
//! `TRIAGE_GATE__THRESHOLD` -> `gate.threshold`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use triage_config::TriageConfig;
//!
//! let config = TriageConfig::load_with_dotenv().expect("config");
//! println!("threshold: {}", config.gate.threshold);
//! ```

mod error;
mod gate;
mod paths;
mod servicenow;
mod source;

pub use error::ConfigError;
pub use gate::GateConfig;
pub use paths::{ModelsConfig, ReportConfig};
pub use servicenow::ServiceNowConfig;
pub use source::{SourceConfig, UpdateConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LOCAL_CONFIG: &str = ".triage/config.toml";
const ENV_PREFIX: &str = "TRIAGE_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub servicenow: ServiceNowConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub update: UpdateConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl TriageConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if extraction fails, or
    /// [`ConfigError::InvalidValue`] if a loaded value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the provider chain: defaults, then whichever config files
    /// exist (user before project), then `TRIAGE_*` variables.
    pub fn figment() -> Figment {
        let files = Self::global_config_path()
            .into_iter()
            .chain(std::iter::once(PathBuf::from(LOCAL_CONFIG)))
            .filter(|path| path.is_file());

        files
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that extracted cleanly but are out of range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an out-of-range threshold or
    /// a zero poll window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gate.is_valid() {
            return Err(ConfigError::InvalidValue {
                field: "gate.threshold",
                reason: format!("must be within [0, 1], got {}", self.gate.threshold),
            });
        }
        if self.source.window_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.window_minutes",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// The ServiceNow section, or an error if it lacks credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the empty keys if URL,
    /// user or password is unset.
    pub fn require_servicenow(&self) -> Result<&ServiceNowConfig, ConfigError> {
        let missing = self.servicenow.missing_fields();
        if missing.is_empty() {
            Ok(&self.servicenow)
        } else {
            Err(ConfigError::NotConfigured {
                section: "servicenow",
                missing,
            })
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("triage/config.toml"))
    }
}
