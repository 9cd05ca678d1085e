use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info, warn};

use crate::error::CheckError;
use crate::metrics::response::MetricsResponse;
use crate::types::{Aggregation, TimeWindow};

pub const API_VERSION: &str = "2017-05-01-preview";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything needed to ask the metrics endpoint for one metric of one resource.
#[derive(Debug, Clone)]
pub struct MetricQuery<'a> {
    pub resource_path: &'a str,
    pub metric: &'a str,
    pub aggregation: Aggregation,
    pub window: TimeWindow,
    pub filter: Option<&'a str>,
}

pub fn build_metrics_url(base_url: &str, query: &MetricQuery<'_>) -> String {
    let mut url = format!(
        "{}{}/providers/microsoft.insights/metrics?api-version={}&metric={}&timespan={}&aggregation={}",
        base_url.trim_end_matches('/'),
        query.resource_path,
        API_VERSION,
        urlencoding::encode(query.metric),
        urlencoding::encode(&query.window.timespan()),
        query.aggregation.as_str(),
    );
    if let Some(filter) = query.filter.filter(|f| !f.trim().is_empty()) {
        url.push_str("&$filter=");
        url.push_str(&urlencoding::encode(filter));
    }
    url
}

pub struct MetricFetcher {
    http: reqwest::Client,
    base_url: String,
}

impl MetricFetcher {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    pub async fn fetch(&self, auth_header: &str, query: &MetricQuery<'_>) -> Result<MetricsResponse, CheckError> {
        let url = build_metrics_url(&self.base_url, query);
        info!(
            "Requesting metric {} ({}) for {}",
            query.metric, query.aggregation, query.resource_path
        );
        debug!("GET {}", url);

        let res = self
            .http
            .get(&url)
            .header(AUTHORIZATION, auth_header)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| CheckError::Transport { url: url.clone(), source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| CheckError::Transport { url: url.clone(), source })?;

        if status.as_u16() >= 300 {
            warn!("Metrics API returned {}", status);
            return Err(CheckError::Upstream { status: status.as_u16(), body });
        }

        let parsed: MetricsResponse = serde_json::from_str(&body)?;
        debug!("Received {} metric series", parsed.value.len());
        Ok(parsed)
    }
}

pub fn default_http_client() -> Result<reqwest::Client, CheckError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| CheckError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn window() -> TimeWindow {
        TimeWindow::ending_at(Utc.with_ymd_and_hms(2018, 1, 26, 17, 0, 0).unwrap(), 600)
    }

    #[test]
    fn test_build_metrics_url() {
        let query = MetricQuery {
            resource_path: "/resource",
            metric: "metric",
            aggregation: Aggregation::Average,
            window: window(),
            filter: None,
        };

        assert_eq!(
            build_metrics_url("https://management.azure.com", &query),
            "https://management.azure.com/resource/providers/microsoft.insights/metrics?\
             api-version=2017-05-01-preview&metric=metric&\
             timespan=2018-01-26T16%3A50%3A00Z%2F2018-01-26T17%3A00%3A00Z&aggregation=average"
        );
    }

    #[test]
    fn test_build_metrics_url_with_filter() {
        let query = MetricQuery {
            resource_path: "/subscriptions/s/resourceGroups/g/providers/n/t/r",
            metric: "Transactions",
            aggregation: Aggregation::Total,
            window: window(),
            filter: Some("APIName eq '*'"),
        };

        let url = build_metrics_url("https://management.azure.com/", &query);
        assert!(url.starts_with(
            "https://management.azure.com/subscriptions/s/resourceGroups/g/providers/n/t/r/providers/microsoft.insights/metrics?"
        ));
        assert!(url.contains("&aggregation=total"));
        assert!(url.ends_with("&$filter=APIName%20eq%20%27%2A%27"));
    }

    #[test]
    fn test_blank_filter_is_omitted() {
        let query = MetricQuery {
            resource_path: "/r",
            metric: "m",
            aggregation: Aggregation::Count,
            window: window(),
            filter: Some("  "),
        };

        assert!(!build_metrics_url("https://management.azure.com", &query).contains("$filter"));
    }
}
