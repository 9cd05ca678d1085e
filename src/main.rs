use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{info, warn};

use azurerm_monitor_check::config::{load_config, CliArgs};
use azurerm_monitor_check::metrics::default_http_client;
use azurerm_monitor_check::{CheckReport, CheckResult, MetricCheck};

const CHECK_NAME: &str = "CheckAzurermMonitorMetric";

fn main() -> Result<()> {
    init_tracing();
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            // Usage errors are unknown, not clap's default exit code 2 (critical).
            if let Err(io_err) = err.print() {
                warn!("Failed to print usage error: {}", io_err);
            }
            finish(CheckReport::new(CHECK_NAME, CheckResult::unknown("Invalid command line arguments")));
        }
    };

    // The check is strictly sequential, a single-threaded runtime is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(run(&args));
    finish(CheckReport::new(CHECK_NAME, result))
}

fn finish(report: CheckReport) -> ! {
    info!("Check finished with status {}", report.status().label());
    println!("{}", report);
    std::process::exit(report.exit_code())
}

async fn run(args: &CliArgs) -> CheckResult {
    let config = match load_config(args) {
        Ok(cfg) => cfg,
        Err(err) => return err.into(),
    };
    info!("resource = {}, metric = {}", config.resource_path, config.metric);

    let http = match default_http_client() {
        Ok(client) => client,
        Err(err) => return err.into(),
    };

    MetricCheck::new(&config, http).run().await
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
