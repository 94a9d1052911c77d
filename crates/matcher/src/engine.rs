use std::time::Instant;

use ingest::Report;
use store::ReportStore;
use tracing::{debug, info};
use uuid::Uuid;

use crate::metrics::metrics_recorder;
use crate::signal::{default_signals, Signal};
use crate::types::{Match, MatchConfig, MatchError};


/// Scores a report against the opposite population and ranks the results.
///
/// The matcher never mutates anything: [`Matcher::find_matches`] is a pure
/// function of the query and the snapshot it is given.
pub struct Matcher {
    cfg: MatchConfig,
    signals: Vec<Box<dyn Signal>>,
}

impl Matcher {
    /// Build a matcher with the standard signals for `cfg`.
    pub fn new(cfg: MatchConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        let signals = default_signals(&cfg);
        Ok(Self { cfg, signals })
    }

    /// Build a matcher with a caller-supplied signal list, evaluated in order.
    ///
    /// `version` and `max_results` are validated as in [`Matcher::new`]. The
    /// weight fields of `cfg` do not describe a custom list, so the weight
    /// and `min_score` reachability checks are skipped; a `min_score` above
    /// what the signals can award simply yields no matches.
    pub fn with_signals(cfg: MatchConfig, signals: Vec<Box<dyn Signal>>) -> Result<Self, MatchError> {
        cfg.validate_limits()?;
        Ok(Self { cfg, signals })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Rank `snapshot` against `query`.
    ///
    /// Only opposite-type, active reports are scored. Candidates below
    /// `min_score` are dropped; the rest are sorted by score, highest first,
    /// with ties keeping snapshot order.
    pub fn find_matches(&self, query: &Report, snapshot: &[Report]) -> Vec<Match> {
        let start = Instant::now();
        let target = query.item_type.opposite();

        let mut candidates = 0usize;
        let mut matches = Vec::new();
        for candidate in snapshot
            .iter()
            .filter(|r| r.item_type == target && r.is_active())
        {
            candidates += 1;
            let (score, reasons) = self.score(query, candidate);
            debug!(
                report_id = %query.id,
                candidate_id = %candidate.id,
                score,
                reasons = ?reasons,
                "match_candidate"
            );
            if score >= self.cfg.min_score {
                matches.push(Match {
                    id: new_match_id(),
                    report_id: query.id.clone(),
                    match_id: candidate.id.clone(),
                    score,
                    reason: reasons.join(", "),
                });
            }
        }

        // `sort_by` is stable, so equal scores stay in snapshot order.
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        if let Some(cap) = self.cfg.max_results {
            matches.truncate(cap);
        }

        let latency = start.elapsed();
        info!(
            report_id = %query.id,
            item_type = %query.item_type,
            snapshot_len = snapshot.len(),
            candidates,
            hits = matches.len(),
            elapsed_micros = latency.as_micros(),
            "match_complete"
        );
        if let Some(recorder) = metrics_recorder() {
            recorder.record_match(query.item_type, latency, candidates, matches.len());
        }

        matches
    }

    /// Read the current store snapshot and rank it against `query`.
    pub fn match_report(
        &self,
        store: &dyn ReportStore,
        query: &Report,
    ) -> Result<Vec<Match>, MatchError> {
        let snapshot = store.all()?;
        Ok(self.find_matches(query, &snapshot))
    }

    fn score(&self, query: &Report, candidate: &Report) -> (u32, Vec<&'static str>) {
        self.signals
            .iter()
            .filter_map(|signal| signal.evaluate(query, candidate))
            .fold((0u32, Vec::new()), |(score, mut reasons), hit| {
                reasons.push(hit.reason);
                (score.saturating_add(hit.points), reasons)
            })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        let signals = default_signals(&cfg);
        Self { cfg, signals }
    }
}

/// `m-` plus a short random suffix.
fn new_match_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("m-{}", &suffix[..5])
}
