//! The fixed-schema feature vector shared by all classifiers.
//!
//! All three classifiers are trained on the same 14 columns: ten normalized
//! text features plus four integer parts derived from `opened_at`. The column
//! names in [`FeatureVector::NAMES`] are the keys used by model artifacts.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub subcategory: String,
    pub category: String,
    pub priority: String,
    pub configuration_item: String,
    pub location: String,
    pub business_unit: String,
    pub legal_entity: String,
    pub reported_by: String,
    pub opened_by: String,
    /// 0-23.
    pub hour: u32,
    /// 0 (Monday) to 6 (Sunday).
    pub week_day: u32,
    /// 1-12.
    pub opened_month: u32,
    pub opened_year: i32,
    pub team_classification: String,
}

/// A single feature value, borrowed from a [`FeatureVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureValue<'a> {
    Text(&'a str),
    Int(i64),
}

impl fmt::Display for FeatureValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl FeatureVector {
    /// Column names in training order.
    pub const NAMES: [&'static str; 14] = [
        "Subcategory",
        "Category",
        "Priority",
        "Configuration item",
        "Location",
        "Business unit",
        "Legal Entity",
        "Reported By",
        "Opened by",
        "Hour",
        "Week Day",
        "Opened Month",
        "Opened Year",
        "Team Classification",
    ];

    /// Look up a feature by column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<FeatureValue<'_>> {
        let value = match name {
            "Subcategory" => FeatureValue::Text(&self.subcategory),
            "Category" => FeatureValue::Text(&self.category),
            "Priority" => FeatureValue::Text(&self.priority),
            "Configuration item" => FeatureValue::Text(&self.configuration_item),
            "Location" => FeatureValue::Text(&self.location),
            "Business unit" => FeatureValue::Text(&self.business_unit),
            "Legal Entity" => FeatureValue::Text(&self.legal_entity),
            "Reported By" => FeatureValue::Text(&self.reported_by),
            "Opened by" => FeatureValue::Text(&self.opened_by),
            "Hour" => FeatureValue::Int(i64::from(self.hour)),
            "Week Day" => FeatureValue::Int(i64::from(self.week_day)),
            "Opened Month" => FeatureValue::Int(i64::from(self.opened_month)),
            "Opened Year" => FeatureValue::Int(i64::from(self.opened_year)),
            "Team Classification" => FeatureValue::Text(&self.team_classification),
            _ => return None,
        };
        Some(value)
    }

    /// Iterate `(column, value)` pairs in training order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FeatureValue<'_>)> {
        Self::NAMES
            .iter()
            .filter_map(move |name| self.get(name).map(|value| (*name, value)))
    }
}
