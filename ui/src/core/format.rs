//! Formatting helpers for presenting counts, shares, and dimension values.

use serde_json::Value;

use super::pipeline::Criteria;

/// Occurrence counts are stored as `f64`; whole numbers print without a fraction.
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}%")
    } else {
        "—".to_string()
    }
}

/// Empty dimension values still need something clickable in lists and legends.
pub fn display_label(value: &str) -> String {
    if value.is_empty() {
        "(empty)".to_string()
    } else {
        value.to_string()
    }
}

pub fn criteria_label(criteria: &Criteria) -> String {
    match &criteria.0 {
        Value::Null => "null".to_string(),
        Value::String(s) => display_label(s),
        other => other.to_string(),
    }
}
