//! Sanitizer metrics
//!
//! Counters for roles seen, dropped, truncated and merged. Without an installed
//! recorder every call is a no-op, so library users pay nothing for them.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::warn;

use crate::sanitize::DropReason;

/// Builds a metric name following `council_roles_<phase>_<name>_total`
macro_rules! phase_metric {
    (counter, $phase:expr, $name:expr) => {
        concat!("council_roles_", $phase, "_", $name, "_total")
    };
}

/// Metrics collection for the role sanitizer
pub struct SanitizerMetrics;

impl SanitizerMetrics {
    pub fn record_person_sanitized() {
        ::metrics::counter!(phase_metric!(counter, "sanitizer", "persons")).increment(1);
    }

    pub fn record_roles_seen(count: usize) {
        ::metrics::counter!(phase_metric!(counter, "sanitizer", "roles_seen")).increment(count as u64);
    }

    pub fn record_role_dropped(reason: DropReason) {
        ::metrics::counter!(
            phase_metric!(counter, "sanitizer", "roles_dropped"),
            "reason" => reason.as_str()
        )
        .increment(1);
    }

    pub fn record_roles_truncated(count: usize) {
        ::metrics::counter!(phase_metric!(counter, "sanitizer", "roles_truncated")).increment(count as u64);
    }

    pub fn record_static_roles_merged(count: usize) {
        ::metrics::counter!(phase_metric!(counter, "sanitizer", "static_roles_merged"))
            .increment(count as u64);
    }

    pub fn register_metrics() {
        use metrics::describe_counter;

        describe_counter!(
            phase_metric!(counter, "sanitizer", "persons"),
            "Total number of persons whose roles were sanitized"
        );
        describe_counter!(
            phase_metric!(counter, "sanitizer", "roles_seen"),
            "Total number of scraped roles given to the sanitizer"
        );
        describe_counter!(
            phase_metric!(counter, "sanitizer", "roles_dropped"),
            "Total number of scraped roles dropped, labelled by reason"
        );
        describe_counter!(
            phase_metric!(counter, "sanitizer", "roles_truncated"),
            "Total number of councilmember terms whose end was moved to resolve an overlap"
        );
        describe_counter!(
            phase_metric!(counter, "sanitizer", "static_roles_merged"),
            "Total number of static override roles appended to sanitized output"
        );
    }
}

/// Install an in-process Prometheus recorder for short-lived CLI runs.
///
/// Returns a handle whose `render()` gives the exposition text, or `None` when
/// a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            SanitizerMetrics::register_metrics();
            Some(handle)
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_phase_metric_macro() {
        assert_eq!(
            phase_metric!(counter, "sanitizer", "roles_dropped"),
            "council_roles_sanitizer_roles_dropped_total"
        );
    }
}
