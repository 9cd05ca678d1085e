use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::types::Aggregation;

/// Body of a `microsoft.insights/metrics` query.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub timespan: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub value: Vec<MetricSeries>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<LocalizableString>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub timeseries: Vec<TimeSeriesElement>,
}

impl MetricSeries {
    pub fn metric_name(&self) -> Option<&str> {
        self.name
            .as_ref()
            .map(|n| n.value.as_str())
            .filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizableString {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub localized_value: Option<String>,
}

/// One dimension combination of a metric.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesElement {
    #[serde(default)]
    pub metadatavalues: Vec<MetadataValue>,
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct MetadataValue {
    #[serde(default)]
    pub name: Option<LocalizableString>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    #[serde(default)]
    pub time_stamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub average: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub count: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub maximum: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub minimum: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total: Option<f64>,
}

impl DataPoint {
    pub fn value_for(&self, aggregation: Aggregation) -> Option<f64> {
        match aggregation {
            Aggregation::Average => self.average,
            Aggregation::Count => self.count,
            Aggregation::Maximum => self.maximum,
            Aggregation::Minimum => self.minimum,
            Aggregation::Total => self.total,
        }
    }
}

// Numbers normally arrive as JSON numbers, but numeric strings are accepted too.
// Anything else counts as absent, including NaN and infinities.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let value = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}
