use std::collections::HashMap;

use clap::Parser;

use crate::error::CheckError;
use crate::resource;
use crate::types::{
    Aggregation, AuthMethod, CheckConfig, ResourceSpec, Thresholds, DEFAULT_AUTHORITY_URL, DEFAULT_BASE_URL,
    DEFAULT_IDENTITY_RESOURCE, DEFAULT_LOCAL_AUTH_PORT, DEFAULT_LOOKBACK_SECONDS, MAX_LOOKBACK_SECONDS,
};

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Checks an Azure Monitor metric against thresholds
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "check-azurerm-monitor-metric", version)]
pub struct CliArgs {
    /// ARM Tenant ID. Defaults to ARM_TENANT_ID
    #[arg(short = 't', long = "tenant")]
    pub tenant_id: Option<String>,

    /// ARM Client ID. Defaults to ARM_CLIENT_ID
    #[arg(short = 'i', long = "client")]
    pub client_id: Option<String>,

    /// ARM Client Secret. Defaults to ARM_CLIENT_SECRET
    #[arg(short = 's', long = "client-secret", alias = "clientSecret")]
    pub client_secret: Option<String>,

    /// Authority used for the service principal token request
    #[arg(long = "authority-url", default_value = DEFAULT_AUTHORITY_URL)]
    pub authority_url: String,

    /// Use the managed identity endpoint instead of a service principal
    #[arg(short = 'l', long = "use-assigned-identity")]
    pub use_assigned_identity: bool,

    /// Port of the local managed identity endpoint
    #[arg(short = 'o', long = "local-auth-port", default_value_t = DEFAULT_LOCAL_AUTH_PORT)]
    pub local_auth_port: u16,

    /// Resource the managed identity token is requested for
    #[arg(long = "assigned-identity-resource", default_value = DEFAULT_IDENTITY_RESOURCE)]
    pub assigned_identity_resource: String,

    /// ARM Subscription ID. Defaults to ARM_SUBSCRIPTION_ID
    #[arg(short = 'S', long = "subscription")]
    pub subscription_id: Option<String>,

    /// Full id of the resource. When given, name/type/namespace/group are ignored
    #[arg(short = 'r', long = "resource-id", alias = "resource", default_value = "")]
    pub resource_id: String,

    /// Name of the resource. Requires type, namespace, group and subscription
    #[arg(short = 'e', long = "resource-name", default_value = "")]
    pub resource_name: String,

    /// Resource type, without the namespace
    #[arg(short = 'y', long = "resource-type", default_value = "")]
    pub resource_type: String,

    /// Resource namespace, e.g. Microsoft.Network
    #[arg(short = 'n', long = "resource-namespace", default_value = "")]
    pub resource_namespace: String,

    /// Resource group
    #[arg(short = 'g', long = "resource-group", default_value = "")]
    pub resource_group: String,

    /// Parent resource, e.g. the namespace of a topic
    #[arg(short = 'p', long = "resource-parent", default_value = "")]
    pub resource_parent: String,

    /// Name of the metric
    #[arg(short = 'm', long = "metric")]
    pub metric: String,

    /// Dimension filter, e.g. "APIName eq '*'"
    #[arg(short = 'f', long = "filter")]
    pub filter: Option<String>,

    /// average, count, maximum, minimum or total
    #[arg(short = 'a', long = "aggregation", default_value = "average")]
    pub aggregation: String,

    /// Critical if the metric goes over this value
    #[arg(short = 'c', long = "critical", allow_negative_numbers = true)]
    pub critical_over: Option<f64>,

    /// Warning if the metric goes over this value
    #[arg(short = 'w', long = "warning", allow_negative_numbers = true)]
    pub warning_over: Option<f64>,

    /// Critical if the metric goes under this value
    #[arg(short = 'C', long = "critical-under", allow_negative_numbers = true)]
    pub critical_under: Option<f64>,

    /// Warning if the metric goes under this value
    #[arg(short = 'W', long = "warning-under", allow_negative_numbers = true)]
    pub warning_under: Option<f64>,

    /// Seconds of history to query, ending now
    #[arg(short = 'b', long = "lookback-period", default_value_t = DEFAULT_LOOKBACK_SECONDS)]
    pub lookback_period: i64,

    /// Management API endpoint
    #[arg(long = "base-url", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Aggregate every returned sample into one value instead of checking the last value of each series
    #[arg(long = "aggregate-results")]
    pub aggregate_results: bool,
}

pub fn load_config(args: &CliArgs) -> Result<CheckConfig, CheckError> {
    load_config_with_env(args, &SystemEnvironment)
}

/// Validate flags, fill credentials from the `ARM_*` variables and resolve the resource path.
pub fn load_config_with_env<E: EnvironmentProvider>(args: &CliArgs, env: &E) -> Result<CheckConfig, CheckError> {
    let thresholds = Thresholds {
        critical_over: args.critical_over,
        warning_over: args.warning_over,
        critical_under: args.critical_under,
        warning_under: args.warning_under,
    };
    if thresholds.is_empty() {
        return Err(CheckError::Configuration("At least one threshold must be provided.".to_string()));
    }

    let metric = args.metric.trim().to_string();
    if metric.is_empty() {
        return Err(CheckError::Configuration("A metric name must be provided.".to_string()));
    }

    let aggregation: Aggregation = args.aggregation.parse().map_err(CheckError::Configuration)?;

    if args.lookback_period <= 0 || args.lookback_period > MAX_LOOKBACK_SECONDS {
        return Err(CheckError::Configuration(format!(
            "Lookback period must be between 1 and {} seconds, got {}",
            MAX_LOOKBACK_SECONDS, args.lookback_period
        )));
    }

    let subscription_id = flag_or_env(&args.subscription_id, env, "ARM_SUBSCRIPTION_ID").unwrap_or_default();
    let resource_path = resource::resolve(&ResourceSpec {
        resource_id: args.resource_id.clone(),
        subscription_id,
        resource_group: args.resource_group.clone(),
        namespace: args.resource_namespace.clone(),
        resource_type: args.resource_type.clone(),
        parent: args.resource_parent.clone(),
        name: args.resource_name.clone(),
    })?;

    let auth = if args.use_assigned_identity {
        AuthMethod::ManagedIdentity {
            local_port: args.local_auth_port,
            resource: args.assigned_identity_resource.clone(),
        }
    } else {
        let tenant_id = flag_or_env(&args.tenant_id, env, "ARM_TENANT_ID");
        let client_id = flag_or_env(&args.client_id, env, "ARM_CLIENT_ID");
        let client_secret = flag_or_env(&args.client_secret, env, "ARM_CLIENT_SECRET");
        match (tenant_id, client_id, client_secret) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => AuthMethod::ServicePrincipal {
                authority_url: args.authority_url.clone(),
                tenant_id,
                client_id,
                client_secret,
            },
            _ => {
                return Err(CheckError::Configuration(
                    "Tenant, client and client secret must be provided (or set ARM_TENANT_ID, ARM_CLIENT_ID and \
                     ARM_CLIENT_SECRET), unless --use-assigned-identity is given"
                        .to_string(),
                ))
            }
        }
    };

    Ok(CheckConfig {
        auth,
        resource_path,
        metric,
        aggregation,
        filter: args.filter.clone().filter(|f| !f.trim().is_empty()),
        thresholds,
        lookback_seconds: args.lookback_period,
        base_url: args.base_url.clone(),
        aggregate_results: args.aggregate_results,
    })
}

// Flag wins, then the environment. Blank values count as unset.
fn flag_or_env<E: EnvironmentProvider>(flag: &Option<String>, env: &E, key: &str) -> Option<String> {
    flag.clone()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| env.get_var(key).filter(|v| !v.trim().is_empty()))
}
