use crate::types::Aggregation;

/// Reduce raw samples to one number. `None` for an empty slice.
pub fn aggregate(values: &[f64], aggregation: Aggregation) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let result = match aggregation {
        Aggregation::Average => values.iter().sum::<f64>() / values.len() as f64,
        Aggregation::Maximum => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Aggregation::Minimum => values.iter().copied().fold(f64::INFINITY, f64::min),
        Aggregation::Total => values.iter().sum(),
        Aggregation::Count => values.len() as f64,
    };
    Some(result)
}
