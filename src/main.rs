use mmode_probe::config::ProbeConfig;
use mmode_probe::engine::cases::pubmed_cases;
use mmode_probe::engine::suite::run_suite;
use mmode_probe::network::client::RedirectProber;
use mmode_probe::ops::telemetry;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // * Initialize Telemetry
    telemetry::init_tracing();

    let config = match ProbeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        base_url = %config.base_url,
        timeout_ms = config.timeout.as_millis() as u64,
        cookie_policy = %config.cookie_policy,
        "Redirect suite starting"
    );

    let prober = RedirectProber::new(config);
    let report = run_suite(&prober, &pubmed_cases()).await;

    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!(error = %e, "Failed to render report"),
    }
    tracing::debug!(metrics = %telemetry::get_metrics_string(), "Final metrics");

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
