// Metric query plumbing: wire types and the HTTP fetcher
pub mod client;
pub mod response;

pub use client::{build_metrics_url, default_http_client, MetricFetcher, MetricQuery, API_VERSION};
pub use response::{DataPoint, LocalizableString, MetricSeries, MetricsResponse, TimeSeriesElement};
