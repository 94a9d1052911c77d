//! Scoring signals.
//!
//! Each signal looks at one aspect of a (query, candidate) pair and either
//! contributes points with a human-readable reason or stays silent. Signals
//! are pure and independent; the engine evaluates them in order and folds
//! the hits into a score and a reason string.
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ingest::Report;

use crate::types::MatchConfig;

pub const CATEGORY_REASON: &str = "Category Match";
pub const TITLE_REASON: &str = "Title Similarity";
pub const DATE_REASON: &str = "Reported within same week";

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Points awarded by a single signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalHit {
    pub points: u32,
    pub reason: &'static str,
}

/// A named, pure evaluator over a query/candidate pair.
pub trait Signal: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, query: &Report, candidate: &Report) -> Option<SignalHit>;
}

/// Exact, case-sensitive category label equality.
#[derive(Debug, Clone, Copy)]
pub struct CategorySignal {
    pub points: u32,
}

impl Signal for CategorySignal {
    fn name(&self) -> &'static str {
        "category"
    }

    fn evaluate(&self, query: &Report, candidate: &Report) -> Option<SignalHit> {
        (query.category.label() == candidate.category.label()).then_some(SignalHit {
            points: self.points,
            reason: CATEGORY_REASON,
        })
    }
}

/// Lower-cased substring containment in either direction.
///
/// An empty title is contained in every title, so it always fires.
#[derive(Debug, Clone, Copy)]
pub struct TitleSignal {
    pub points: u32,
}

impl Signal for TitleSignal {
    fn name(&self) -> &'static str {
        "title"
    }

    fn evaluate(&self, query: &Report, candidate: &Report) -> Option<SignalHit> {
        let q = query.title.to_lowercase();
        let c = candidate.title.to_lowercase();
        (c.contains(&q) || q.contains(&c)).then_some(SignalHit {
            points: self.points,
            reason: TITLE_REASON,
        })
    }
}

/// Fires when both dates parse and lie within `window_days` of each other.
#[derive(Debug, Clone, Copy)]
pub struct DateProximitySignal {
    pub points: u32,
    pub window_days: u32,
}

impl Signal for DateProximitySignal {
    fn name(&self) -> &'static str {
        "date"
    }

    fn evaluate(&self, query: &Report, candidate: &Report) -> Option<SignalHit> {
        let days = days_between(&query.date, &candidate.date)?;
        (days <= f64::from(self.window_days)).then_some(SignalHit {
            points: self.points,
            reason: DATE_REASON,
        })
    }
}

/// Absolute distance in fractional days, or `None` when either side does
/// not parse.
pub fn days_between(a: &str, b: &str) -> Option<f64> {
    let a = parse_report_date(a)?;
    let b = parse_report_date(b)?;
    let millis = (a - b).num_milliseconds().unsigned_abs();
    Some(millis as f64 / MILLIS_PER_DAY)
}

/// Parse a stored report date into a UTC instant.
///
/// Accepts `YYYY-MM-DD` (midnight), RFC 3339 timestamps, and
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]` without an offset, read as UTC.
pub fn parse_report_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// The standard signal list for a configuration, in evaluation order.
/// Zero-weight signals are left out.
pub fn default_signals(cfg: &MatchConfig) -> Vec<Box<dyn Signal>> {
    let mut signals: Vec<Box<dyn Signal>> = Vec::with_capacity(3);
    if cfg.category_weight > 0 {
        signals.push(Box::new(CategorySignal {
            points: cfg.category_weight,
        }));
    }
    if cfg.title_weight > 0 {
        signals.push(Box::new(TitleSignal {
            points: cfg.title_weight,
        }));
    }
    if cfg.date_weight > 0 {
        signals.push(Box::new(DateProximitySignal {
            points: cfg.date_weight,
            window_days: cfg.date_window_days,
        }));
    }
    signals
}
