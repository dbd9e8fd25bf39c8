// * Operations: structured logging and probe metrics

pub mod telemetry;

// * Re-exports for convenient access
pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_with_level,
    record_case, record_probe_duration, record_probe_failure, record_probe_success,
};
