//! Application metrics for Prometheus monitoring.
//!
//! This module provides:
//! - Prometheus recorder initialization
//! - Metric descriptions (request, score and cache metrics)
//! - Recording helpers used by the route handlers

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::error::ApiResult;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at startup, before any metrics are recorded.
/// Returns `true` if initialization succeeded, `false` if already initialized.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        return false;
    }

    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    if metrics::set_global_recorder(recorder).is_err() {
        tracing::warn!("Failed to set global metrics recorder (already set)");
        return false;
    }

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        tracing::warn!("Failed to store Prometheus handle (already set)");
    }

    describe_metrics();

    tracing::info!("Prometheus metrics initialized");
    true
}

fn describe_metrics() {
    describe_counter!("dmphq_requests_total", "Total number of API requests");
    describe_histogram!(
        "dmphq_request_duration_seconds",
        "Duration of API requests in seconds"
    );

    describe_counter!(
        "automation_score_computations_total",
        "Automation score passes by kind (summary, details, adhoc)"
    );
    describe_gauge!(
        "automation_score_last",
        "Most recent overall automation score per tenant"
    );

    describe_counter!(
        "automation_score_cache_total",
        "Details cache lookups by result (hit, miss, stale)"
    );
}

/// Render current metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

/// Record a completed API request.
pub fn record_request(endpoint: &str, status: &str, duration: Duration) {
    counter!("dmphq_requests_total", "endpoint" => endpoint.to_string(), "status" => status.to_string())
        .increment(1);
    histogram!("dmphq_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(duration.as_secs_f64());
}

/// Record one score computation.
///
/// `tenant_id` is `None` for ad-hoc scoring of posted inputs, which has no
/// tenant to attach a gauge to.
pub fn record_score(kind: &str, tenant_id: Option<&str>, score: u8) {
    counter!("automation_score_computations_total", "kind" => kind.to_string()).increment(1);
    if let Some(tenant) = tenant_id {
        gauge!("automation_score_last", "tenant" => tenant.to_string()).set(f64::from(score));
    }
}

/// Record a details cache lookup.
pub fn record_cache(result: &str) {
    counter!("automation_score_cache_total", "result" => result.to_string()).increment(1);
}

/// Helper for timing request handlers.
///
/// ```ignore
/// let timer = RequestTimer::new("tenant_details");
/// // ... do work ...
/// timer.finish_ok(); // or timer.finish_err(status_code)
/// ```
pub struct RequestTimer {
    endpoint: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            start: Instant::now(),
        }
    }

    pub fn finish_ok(self) {
        record_request(self.endpoint, "200", self.start.elapsed());
    }

    pub fn finish_err(self, status: u16) {
        record_request(self.endpoint, &status.to_string(), self.start.elapsed());
    }

    /// Finish with the status a handler result maps to.
    pub fn finish_result<T>(self, result: &ApiResult<T>) {
        match result {
            Ok(_) => self.finish_ok(),
            Err(e) => self.finish_err(e.status().as_u16()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_timer() {
        let timer = RequestTimer::new("test_endpoint");
        std::thread::sleep(Duration::from_millis(1));
        timer.finish_ok();

        RequestTimer::new("test_endpoint").finish_err(404);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_score("adhoc", None, 42);
        record_score("summary", Some("acme"), 71);
        record_cache("hit");
    }

    #[test]
    fn test_init_then_render() {
        init_metrics();
        assert!(render_metrics().is_some());
        // A second init reports that the recorder is already installed.
        assert!(!init_metrics());
    }
}
