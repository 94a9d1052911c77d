//! Prometheus wiring for the server.
//!
//! Matcher calls reach the `metrics` facade through a [`MatchMetrics`]
//! bridge; HTTP requests are recorded by the logging middleware. Without an
//! installed recorder every macro call is a no-op.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use retrieveit::{set_match_metrics, ItemType, MatchMetrics};

pub const MATCH_CALLS: &str = "retrieveit_match_calls_total";
pub const MATCH_LATENCY: &str = "retrieveit_match_latency_seconds";
pub const MATCH_CANDIDATES: &str = "retrieveit_match_candidates";
pub const MATCH_HITS: &str = "retrieveit_match_hits";
pub const HTTP_REQUESTS: &str = "retrieveit_http_requests_total";
pub const HTTP_LATENCY: &str = "retrieveit_http_request_duration_seconds";

/// Forwards matcher observations to the `metrics` facade.
#[derive(Debug, Default)]
pub struct PrometheusMatchMetrics;

impl MatchMetrics for PrometheusMatchMetrics {
    fn record_match(&self, query_type: ItemType, latency: Duration, candidates: usize, hits: usize) {
        let query_type = query_type.as_str();
        metrics::counter!(MATCH_CALLS, "query_type" => query_type).increment(1);
        metrics::histogram!(MATCH_LATENCY, "query_type" => query_type)
            .record(latency.as_secs_f64());
        metrics::histogram!(MATCH_CANDIDATES, "query_type" => query_type).record(candidates as f64);
        metrics::histogram!(MATCH_HITS, "query_type" => query_type).record(hits as f64);
    }
}

pub(crate) fn record_http_request(method: &str, status: u16, latency: Duration) {
    metrics::counter!(
        HTTP_REQUESTS,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(HTTP_LATENCY, "method" => method.to_string()).record(latency.as_secs_f64());
}

/// Install the global Prometheus recorder and the matcher bridge.
///
/// Returns `None` when a recorder is already installed in this process.
pub fn install() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            set_match_metrics(Some(Arc::new(PrometheusMatchMetrics)));
            Some(handle)
        }
        Err(err) => {
            tracing::warn!(error = %err, "metrics_recorder_unavailable");
            None
        }
    }
}
