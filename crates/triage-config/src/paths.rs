//! Artifact and report locations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsConfig {
    #[serde(default = "ModelsConfig::default_assignment_group")]
    pub assignment_group: PathBuf,
    #[serde(default = "ModelsConfig::default_category")]
    pub category: PathBuf,
    #[serde(default = "ModelsConfig::default_subcategory")]
    pub subcategory: PathBuf,
    /// Category code → display label table.
    #[serde(default = "ModelsConfig::default_category_lookup")]
    pub category_lookup: PathBuf,
    /// Subcategory code → display label table.
    #[serde(default = "ModelsConfig::default_subcategory_lookup")]
    pub subcategory_lookup: PathBuf,
}

impl ModelsConfig {
    fn default_assignment_group() -> PathBuf {
        PathBuf::from(".triage/models/assignment_group.json")
    }

    fn default_category() -> PathBuf {
        PathBuf::from(".triage/models/category.json")
    }

    fn default_subcategory() -> PathBuf {
        PathBuf::from(".triage/models/subcategory.json")
    }

    fn default_category_lookup() -> PathBuf {
        PathBuf::from(".triage/models/category_lookup.jsonl")
    }

    fn default_subcategory_lookup() -> PathBuf {
        PathBuf::from(".triage/models/subcategory_lookup.jsonl")
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            assignment_group: Self::default_assignment_group(),
            category: Self::default_category(),
            subcategory: Self::default_subcategory(),
            category_lookup: Self::default_category_lookup(),
            subcategory_lookup: Self::default_subcategory_lookup(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Date-grouped summary rows.
    #[serde(default = "ReportConfig::default_summary_path")]
    pub summary_path: PathBuf,
    /// Per-incident comparison rows.
    #[serde(default = "ReportConfig::default_changes_path")]
    pub changes_path: PathBuf,
}

impl ReportConfig {
    fn default_summary_path() -> PathBuf {
        PathBuf::from(".triage/reports/summary.jsonl")
    }

    fn default_changes_path() -> PathBuf {
        PathBuf::from(".triage/reports/incident_changes.jsonl")
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            summary_path: Self::default_summary_path(),
            changes_path: Self::default_changes_path(),
        }
    }
}
