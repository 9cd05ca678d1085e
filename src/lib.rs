// Public modules
pub mod types;
pub mod error;
pub mod config;
pub mod resource;
pub mod auth;
pub mod metrics;
pub mod extract;
pub mod aggregate;
pub mod evaluate;
pub mod check;
pub mod report;
pub mod usage;

// Re-export commonly used items
pub use types::*;
pub use error::CheckError;
pub use config::{load_config, load_config_with_env, CliArgs, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use resource::resolve;
pub use auth::Authenticator;
pub use metrics::{MetricFetcher, MetricQuery, MetricsResponse};
pub use extract::{all_values, last_values};
pub use aggregate::aggregate;
pub use evaluate::{classify, evaluate_value, evaluate_values};
pub use check::{evaluate_response, MetricCheck};
pub use report::CheckReport;
