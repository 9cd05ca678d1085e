use crate::types::{CheckResult, CheckStatus, ExtractedValue, Thresholds};

/// Status of a single value. Bounds are strict and checked in the order
/// critical-over, warning-over, critical-under, warning-under.
pub fn classify(value: f64, thresholds: &Thresholds) -> CheckStatus {
    if thresholds.critical_over.is_some_and(|t| value > t) {
        CheckStatus::Critical
    } else if thresholds.warning_over.is_some_and(|t| value > t) {
        CheckStatus::Warning
    } else if thresholds.critical_under.is_some_and(|t| value < t) {
        CheckStatus::Critical
    } else if thresholds.warning_under.is_some_and(|t| value < t) {
        CheckStatus::Warning
    } else {
        CheckStatus::Ok
    }
}

pub fn value_message(metric_name: &str, value: f64) -> String {
    format!("Metric {} is {}", metric_name, format_value(value))
}

// Whole numbers keep one decimal place: `4.0`, not `4`.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Single evaluation of one (possibly aggregated) value.
pub fn evaluate_value(metric_name: &str, value: f64, thresholds: &Thresholds) -> CheckResult {
    CheckResult::new(classify(value, thresholds), value_message(metric_name, value))
}

/// Evaluate every value independently.
///
/// Any critical value makes the result critical and lists all critical values;
/// otherwise any warning lists all warnings; otherwise one ok message. Empty input
/// is unknown, callers are expected to reject it before getting here.
pub fn evaluate_values(values: &[ExtractedValue], thresholds: &Thresholds) -> CheckResult {
    let mut critical: Vec<String> = Vec::new();
    let mut warning: Vec<String> = Vec::new();

    for v in values {
        match classify(v.value, thresholds) {
            CheckStatus::Critical => critical.push(value_message(&v.metric_name, v.value)),
            CheckStatus::Warning => warning.push(value_message(&v.metric_name, v.value)),
            _ => {}
        }
    }

    if !critical.is_empty() {
        return CheckResult::critical(critical.join("\n"));
    }
    if !warning.is_empty() {
        return CheckResult::warning(warning.join("\n"));
    }

    match values {
        [] => CheckResult::unknown("No metric values to evaluate"),
        [only] => CheckResult::ok(value_message(&only.metric_name, only.value)),
        [first, ..] => CheckResult::ok(format!(
            "All {} values of metric {} are within thresholds",
            values.len(),
            first.metric_name
        )),
    }
}
