use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

pub const DEFAULT_BASE_URL: &str = "https://management.azure.com";
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
pub const DEFAULT_IDENTITY_RESOURCE: &str = "https://management.azure.com/";
pub const DEFAULT_LOCAL_AUTH_PORT: u16 = 50342;
pub const DEFAULT_LOOKBACK_SECONDS: i64 = 600;
/// Azure Monitor keeps platform metrics for 93 days.
pub const MAX_LOOKBACK_SECONDS: i64 = 93 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    pub auth: AuthMethod,
    pub resource_path: String,
    pub metric: String,
    pub aggregation: Aggregation,
    pub filter: Option<String>,
    pub thresholds: Thresholds,
    pub lookback_seconds: i64,
    pub base_url: String,
    pub aggregate_results: bool,
}

#[derive(Clone, PartialEq)]
pub enum AuthMethod {
    ServicePrincipal {
        authority_url: String,
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    ManagedIdentity {
        local_port: u16,
        resource: String,
    },
}

// Keeps the client secret out of logs and panic messages.
impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::ServicePrincipal { authority_url, tenant_id, client_id, .. } => f
                .debug_struct("ServicePrincipal")
                .field("authority_url", authority_url)
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
            AuthMethod::ManagedIdentity { local_port, resource } => f
                .debug_struct("ManagedIdentity")
                .field("local_port", local_port)
                .field("resource", resource)
                .finish(),
        }
    }
}

/// Raw resource-addressing inputs, before resolution into a path.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResourceSpec {
    pub resource_id: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub namespace: String,
    pub resource_type: String,
    pub parent: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Average,
    Count,
    Maximum,
    Minimum,
    Total,
}

impl Aggregation {
    /// Lowercase key as used both in the query string and in the response data points.
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Average => "average",
            Aggregation::Count => "count",
            Aggregation::Maximum => "maximum",
            Aggregation::Minimum => "minimum",
            Aggregation::Total => "total",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" => Ok(Aggregation::Average),
            "count" => Ok(Aggregation::Count),
            "maximum" => Ok(Aggregation::Maximum),
            "minimum" => Ok(Aggregation::Minimum),
            "total" => Ok(Aggregation::Total),
            other => Err(format!(
                "unsupported aggregation '{}': expected one of average, count, maximum, minimum, total",
                other
            )),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub critical_over: Option<f64>,
    pub warning_over: Option<f64>,
    pub critical_under: Option<f64>,
    pub warning_under: Option<f64>,
}

impl Thresholds {
    pub fn is_empty(&self) -> bool {
        self.critical_over.is_none()
            && self.warning_over.is_none()
            && self.critical_under.is_none()
            && self.warning_under.is_none()
    }
}

/// Query window ending at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn ending_now(lookback_seconds: i64) -> Self {
        Self::ending_at(Utc::now(), lookback_seconds)
    }

    /// Saturates at the earliest representable instant instead of overflowing.
    pub fn ending_at(end: DateTime<Utc>, lookback_seconds: i64) -> Self {
        let start = Duration::try_seconds(lookback_seconds)
            .and_then(|lookback| end.checked_sub_signed(lookback))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end }
    }

    /// `start/end` in RFC 3339 with second precision and a `Z` suffix.
    pub fn timespan(&self) -> String {
        format!(
            "{}/{}",
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedValue {
    pub metric_name: String,
    pub value: f64,
}

/// Every non-null sample of a response, in forward order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesValues {
    pub metric_name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckStatus {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl CheckStatus {
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckStatus::Ok => 0,
            CheckStatus::Warning => 1,
            CheckStatus::Critical => 2,
            CheckStatus::Unknown => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Warning => "WARNING",
            CheckStatus::Critical => "CRITICAL",
            CheckStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    pub fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Ok, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warning, message)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Critical, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Unknown, message)
    }
}
