use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::auth::Authenticator;
use crate::error::CheckError;
use crate::evaluate::{evaluate_value, evaluate_values};
use crate::extract::{all_values, last_values};
use crate::metrics::{MetricFetcher, MetricQuery, MetricsResponse};
use crate::types::{CheckConfig, CheckResult, TimeWindow};

/// Runs one monitor-metric check: authenticate, fetch, extract, evaluate.
pub struct MetricCheck<'a> {
    config: &'a CheckConfig,
    authenticator: Authenticator,
    fetcher: MetricFetcher,
}

impl<'a> MetricCheck<'a> {
    pub fn new(config: &'a CheckConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            authenticator: Authenticator::new(http.clone()),
            fetcher: MetricFetcher::new(http, config.base_url.clone()),
        }
    }

    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = authenticator;
        self
    }

    /// Never fails: every error is folded into the result's status.
    pub async fn run(&self) -> CheckResult {
        match self.execute(TimeWindow::ending_now(self.config.lookback_seconds)).await {
            Ok(result) => result,
            Err(err) => err.into(),
        }
    }

    pub async fn execute(&self, window: TimeWindow) -> Result<CheckResult, CheckError> {
        let auth_header = self.authenticator.authorize(&self.config.auth).await?;

        let query = MetricQuery {
            resource_path: &self.config.resource_path,
            metric: &self.config.metric,
            aggregation: self.config.aggregation,
            window,
            filter: self.config.filter.as_deref(),
        };
        let response = self.fetcher.fetch(&auth_header, &query).await?;

        evaluate_response(self.config, &response)
    }
}

/// The in-memory half of the check, once the response is at hand.
pub fn evaluate_response(config: &CheckConfig, response: &MetricsResponse) -> Result<CheckResult, CheckError> {
    if config.aggregate_results {
        let series = all_values(response, config.aggregation, &config.metric);
        debug!("Collected {} samples for {}", series.values.len(), series.metric_name);
        let value = aggregate(&series.values, config.aggregation).ok_or_else(|| no_data(config))?;
        info!("Aggregated {} of {} samples: {}", config.aggregation, series.values.len(), value);
        Ok(evaluate_value(&series.metric_name, value, &config.thresholds))
    } else {
        let values = last_values(response, config.aggregation, &config.metric);
        if values.is_empty() {
            return Err(no_data(config));
        }
        info!("Evaluating {} metric values", values.len());
        Ok(evaluate_values(&values, &config.thresholds))
    }
}

fn no_data(config: &CheckConfig) -> CheckError {
    CheckError::NoData {
        metric: config.metric.clone(),
        resource: config.resource_path.clone(),
        aggregation: config.aggregation.to_string(),
    }
}
