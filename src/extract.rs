use crate::metrics::MetricsResponse;
use crate::types::{Aggregation, ExtractedValue, SeriesValues};

/// Latest non-null value of every dimension group, one entry per group.
///
/// Series without any group are skipped. Each group is scanned from the newest
/// point backwards and scanning stops at the first point carrying a value for
/// `aggregation`. Groups where every point is null contribute nothing.
pub fn last_values(resp: &MetricsResponse, aggregation: Aggregation, fallback_name: &str) -> Vec<ExtractedValue> {
    let mut values = Vec::new();

    for series in &resp.value {
        if series.timeseries.is_empty() {
            continue;
        }
        let name = series.metric_name().unwrap_or(fallback_name);

        for group in &series.timeseries {
            if let Some(value) = group.data.iter().rev().find_map(|p| p.value_for(aggregation)) {
                values.push(ExtractedValue {
                    metric_name: name.to_string(),
                    value,
                });
            }
        }
    }

    values
}

/// Every non-null value of every group, in forward order, as one flat list.
///
/// The list is tagged with the name of the first series that contributed a value.
pub fn all_values(resp: &MetricsResponse, aggregation: Aggregation, fallback_name: &str) -> SeriesValues {
    let mut metric_name: Option<&str> = None;
    let mut values = Vec::new();

    for series in &resp.value {
        let before = values.len();
        for group in &series.timeseries {
            values.extend(group.data.iter().filter_map(|p| p.value_for(aggregation)));
        }
        if metric_name.is_none() && values.len() > before {
            metric_name = Some(series.metric_name().unwrap_or(fallback_name));
        }
    }

    SeriesValues {
        metric_name: metric_name.unwrap_or(fallback_name).to_string(),
        values,
    }
}
