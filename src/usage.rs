//! Evaluation primitives shared by the per-resource usage checks (cores, load
//! balancers, public IPs, service bus topics, gateway connectivity) and the
//! metric-output scripts.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::types::CheckResult;

/// Percentage bounds; unlike metric thresholds these are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageThresholds {
    pub warning_percent: f64,
    pub critical_percent: f64,
}

pub fn percentage_used(current: f64, limit: f64) -> Option<f64> {
    if limit > 0.0 {
        Some(current / limit * 100.0)
    } else {
        None
    }
}

/// e.g. `Current usage: 18 of 20 Cores`
pub fn evaluate_usage(current: f64, limit: f64, unit: &str, thresholds: &UsageThresholds) -> CheckResult {
    let message = format!("Current usage: {} of {} {}", current, limit, unit);

    match percentage_used(current, limit) {
        None => CheckResult::unknown(format!("{} (no usable limit)", message)),
        Some(pct) if pct >= thresholds.critical_percent => CheckResult::critical(message),
        Some(pct) if pct >= thresholds.warning_percent => CheckResult::warning(message),
        Some(_) => CheckResult::ok(message),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConnection {
    pub name: String,
    pub connection_status: String,
    pub ingress_bytes: u64,
    pub egress_bytes: u64,
}

impl GatewayConnection {
    pub fn is_connected(&self) -> bool {
        self.connection_status.eq_ignore_ascii_case("connected")
    }

    fn describe(&self, role: &str) -> String {
        format!(
            "{}: State is '{}'. Usage is {} in / {} out.",
            role, self.connection_status, self.ingress_bytes, self.egress_bytes
        )
    }
}

/// Ok while at least one of the two gateways is connected.
pub fn evaluate_gateway_failover(primary: &GatewayConnection, secondary: &GatewayConnection) -> CheckResult {
    let message = format!("{}\n{}", primary.describe("Primary"), secondary.describe("Secondary"));

    if primary.is_connected() || secondary.is_connected() {
        CheckResult::ok(message)
    } else {
        CheckResult::critical(message)
    }
}

/// Dotted metric path: spaces become `_`, braces and brackets are dropped.
pub fn metric_path(scheme: &str, parts: &[&str]) -> String {
    std::iter::once(scheme)
        .chain(parts.iter().copied())
        .collect::<Vec<_>>()
        .join(".")
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '[' | ']'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// One `name value timestamp` output line.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricLine {
    pub name: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for MetricLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.value, self.timestamp.timestamp())
    }
}
