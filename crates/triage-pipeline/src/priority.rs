//! Deterministic (impact, urgency) → priority mapping.
//!
//! Labels use the coded vocabulary (`"p1 - critical"` .. `"p4 - low"`), the
//! same strings the normalizer uses for the `Priority` feature.

use serde_json::Value;
use triage_core::FieldPrediction;

/// Confidence reported when impact or urgency is unusable.
pub const FALLBACK_CONFIDENCE: f64 = 0.50;

/// Confidence reported for any computed result.
pub const EXACT_CONFIDENCE: f64 = 1.00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "p1 - critical",
            Self::High => "p2 - high",
            Self::Medium => "p3 - medium",
            Self::Low => "p4 - low",
        }
    }
}

/// The default when no real lookup happens.
pub const DEFAULT_LEVEL: PriorityLevel = PriorityLevel::Medium;

/// Rows are impact 1..=4, columns urgency 1..=4.
const MATRIX: [[PriorityLevel; 4]; 4] = {
    use self::PriorityLevel::{Critical as C, High as H, Low as L, Medium as M};
    [
        [C, H, M, L],
        [H, H, M, L],
        [M, M, M, L],
        [L, L, L, L],
    ]
};

/// Map impact and urgency to a priority prediction.
///
/// - either value absent or not an integer: default at 0.50
/// - both within 1..=4: the matrix cell at 1.00
/// - out of range: default at 1.00
#[must_use]
pub fn map_priority(impact: Option<&Value>, urgency: Option<&Value>) -> FieldPrediction {
    let (Some(impact), Some(urgency)) = (coerce_level(impact), coerce_level(urgency)) else {
        return FieldPrediction::new(DEFAULT_LEVEL.label(), FALLBACK_CONFIDENCE);
    };
    let level = cell(impact, urgency).unwrap_or(DEFAULT_LEVEL);
    FieldPrediction::new(level.label(), EXACT_CONFIDENCE)
}

/// Coerce a raw impact/urgency value to an integer.
///
/// Accepts JSON integers and strings holding one (`"2"`, `" 3 "`).
#[must_use]
pub fn coerce_level(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cell(impact: i64, urgency: i64) -> Option<PriorityLevel> {
    let row = usize::try_from(impact.checked_sub(1)?).ok()?;
    let col = usize::try_from(urgency.checked_sub(1)?).ok()?;
    MATRIX.get(row)?.get(col).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn assert_prediction(p: &FieldPrediction, label: &str, confidence: f64) {
        assert_eq!(p.label, label);
        assert!((p.confidence - confidence).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(1, 1, "p1 - critical")]
    #[case(1, 2, "p2 - high")]
    #[case(2, 1, "p2 - high")]
    #[case(2, 2, "p2 - high")]
    #[case(1, 3, "p3 - medium")]
    #[case(3, 3, "p3 - medium")]
    #[case(3, 2, "p3 - medium")]
    #[case(1, 4, "p4 - low")]
    #[case(4, 1, "p4 - low")]
    #[case(4, 4, "p4 - low")]
    fn matrix_cells(#[case] impact: i64, #[case] urgency: i64, #[case] label: &str) {
        let p = map_priority(Some(&json!(impact)), Some(&json!(urgency)));
        assert_prediction(&p, label, EXACT_CONFIDENCE);
    }

    #[rstest]
    #[case(None, Some(json!(1)))]
    #[case(Some(json!(1)), None)]
    #[case(Some(json!("")), Some(json!(2)))]
    #[case(Some(json!("high")), Some(json!(2)))]
    #[case(Some(json!(2.5)), Some(json!(2)))]
    #[case(Some(json!(true)), Some(json!(2)))]
    fn unusable_input_falls_back(#[case] impact: Option<Value>, #[case] urgency: Option<Value>) {
        let p = map_priority(impact.as_ref(), urgency.as_ref());
        assert_prediction(&p, "p3 - medium", FALLBACK_CONFIDENCE);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(5, 2)]
    #[case(2, -1)]
    #[case(i64::MIN, 1)]
    fn out_of_range_is_exact_default(#[case] impact: i64, #[case] urgency: i64) {
        let p = map_priority(Some(&json!(impact)), Some(&json!(urgency)));
        assert_prediction(&p, "p3 - medium", EXACT_CONFIDENCE);
    }

    #[test]
    fn string_levels_are_coerced() {
        let p = map_priority(Some(&json!("1")), Some(&json!(" 2 ")));
        assert_prediction(&p, "p2 - high", EXACT_CONFIDENCE);
    }

    #[test]
    fn moderate_cell_is_computed_not_fallback() {
        let p = map_priority(Some(&json!(3)), Some(&json!(3)));
        assert_prediction(&p, DEFAULT_LEVEL.label(), EXACT_CONFIDENCE);
    }
}
