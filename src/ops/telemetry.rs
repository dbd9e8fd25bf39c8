// * Telemetry - JSON Logging and Prometheus Metrics
// * Structured logging for probe runs and counters for probe/case outcomes

use crate::network::errors::ProbeError;
use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram, register_histogram_vec, CounterVec, Encoder,
    Histogram, HistogramVec, TextEncoder,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    // * Probes by outcome (success, network, timeout, invalid_url, too_many_redirects, invalid_location)
    pub static ref PROBES_TOTAL: CounterVec = register_counter_vec!(
        "mmode_probes_total",
        "Total number of probes by outcome",
        &["outcome"]
    ).unwrap();

    // * Redirect hops per successful probe
    pub static ref REDIRECT_HOPS: Histogram = register_histogram!(
        "mmode_redirect_hops",
        "Redirect hops followed per probe",
        vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0]
    ).unwrap();

    // * Probe duration histogram, including every hop
    pub static ref PROBE_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "mmode_probe_duration_seconds",
        "Probe duration in seconds",
        &["kind"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    // * Cases by outcome (passed, failed, errored)
    pub static ref CASES_TOTAL: CounterVec = register_counter_vec!(
        "mmode_cases_total",
        "Total number of redirect cases by outcome",
        &["outcome"]
    ).unwrap();
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use mmode_probe::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(url = "http://example.org/pubmed", "Probing");
/// ```
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initializes tracing with a custom default level (RUST_LOG still wins)
pub fn init_tracing_with_level(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .init();
}

/// Returns the current metrics as a string
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Metric label for a probe error
pub fn probe_error_label(err: &ProbeError) -> &'static str {
    match err {
        ProbeError::Network(_) => "network",
        ProbeError::Timeout { .. } => "timeout",
        ProbeError::InvalidUrl(_) => "invalid_url",
        ProbeError::TooManyRedirects(_) => "too_many_redirects",
        ProbeError::InvalidLocation(_) => "invalid_location",
    }
}

/// Records a probe that produced a result
pub fn record_probe_success(hops: usize) {
    PROBES_TOTAL.with_label_values(&["success"]).inc();
    REDIRECT_HOPS.observe(hops as f64);
}

/// Records a probe that failed before producing a result
pub fn record_probe_failure(err: &ProbeError) {
    PROBES_TOTAL.with_label_values(&[probe_error_label(err)]).inc();
}

/// Records probe wall time
pub fn record_probe_duration(seconds: f64) {
    PROBE_DURATION_SECONDS
        .with_label_values(&["probe"])
        .observe(seconds);
}

/// Records a finished case
pub fn record_case(outcome: &str) {
    CASES_TOTAL.with_label_values(&[outcome]).inc();
}
