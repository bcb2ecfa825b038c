//! Confidence gate configuration.

use serde::{Deserialize, Serialize};

const fn default_threshold() -> f64 {
    0.75
}

/// The single confidence threshold shared by every gated field.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GateConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

impl GateConfig {
    /// Whether the threshold lies in `[0, 1]`.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_is_valid() {
        let config = GateConfig::default();
        assert!((config.threshold - 0.75).abs() < f64::EPSILON);
        assert!(config.is_valid());
    }

    #[test]
    fn out_of_range_threshold_is_invalid() {
        assert!(!GateConfig { threshold: 1.5 }.is_valid());
        assert!(!GateConfig { threshold: -0.1 }.is_valid());
        assert!(!GateConfig { threshold: f64::NAN }.is_valid());
    }
}
