// Metrics hooks for the `matcher` crate.
//
// Callers install a global `MatchMetrics` implementation via [`set_match_metrics`],
// then every `Matcher` reports per-call latency, candidate count and hit count.
// This keeps instrumentation decoupled from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use ingest::ItemType;
use once_cell::sync::OnceCell;

/// Metrics observer for match operations.
pub trait MatchMetrics: Send + Sync {
    /// Record the outcome of one `find_matches` call.
    ///
    /// `query_type` is the type of the report matches were computed for,
    /// `candidates` the number of opposite-type active reports scored, and
    /// `hits` the number of matches returned after thresholding and capping.
    fn record_match(&self, query_type: ItemType, latency: Duration, candidates: usize, hits: usize);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match metrics recorder.
///
/// Typically called once during service startup so all `Matcher` instances
/// share the same metrics backend.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
