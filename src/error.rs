use thiserror::Error;

use crate::types::{CheckResult, CheckStatus};

/// Every way a single check invocation can end early.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{0}")]
    Configuration(String),

    #[error("Failed to authenticate:\n{0}")]
    Authentication(String),

    #[error("Failed to reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to get metric:\n{body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to parse metric response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("There are no metric values for {metric} on resource {resource} with aggregation {aggregation}")]
    NoData {
        metric: String,
        resource: String,
        aggregation: String,
    },
}

impl CheckError {
    pub fn status(&self) -> CheckStatus {
        match self {
            CheckError::Configuration(_) | CheckError::NoData { .. } => CheckStatus::Unknown,
            CheckError::Authentication(_)
            | CheckError::Transport { .. }
            | CheckError::Upstream { .. }
            | CheckError::Decode(_) => CheckStatus::Critical,
        }
    }
}

impl From<CheckError> for CheckResult {
    fn from(err: CheckError) -> Self {
        CheckResult::new(err.status(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(CheckError::Configuration("x".into()).status(), CheckStatus::Unknown);
        assert_eq!(CheckError::Authentication("x".into()).status(), CheckStatus::Critical);
        assert_eq!(
            CheckError::Upstream { status: 404, body: "nope".into() }.status(),
            CheckStatus::Critical
        );
        assert_eq!(
            CheckError::NoData {
                metric: "m".into(),
                resource: "/r".into(),
                aggregation: "average".into(),
            }
            .status(),
            CheckStatus::Unknown
        );
    }

    #[test]
    fn test_upstream_error_surfaces_body() {
        let result: CheckResult = CheckError::Upstream {
            status: 403,
            body: "{\"error\":\"AuthorizationFailed\"}".into(),
        }
        .into();

        assert_eq!(result.status, CheckStatus::Critical);
        assert!(result.message.starts_with("Failed to get metric:\n"));
        assert!(result.message.contains("AuthorizationFailed"));
    }

    #[test]
    fn test_no_data_message_names_query() {
        let err = CheckError::NoData {
            metric: "TunnelAverageBandwidth".into(),
            resource: "/subscriptions/s/resourceGroups/g/providers/n/t/r".into(),
            aggregation: "average".into(),
        };

        let msg = err.to_string();
        assert!(msg.contains("TunnelAverageBandwidth"));
        assert!(msg.contains("/subscriptions/s/resourceGroups/g/providers/n/t/r"));
        assert!(msg.contains("average"));
    }
}
