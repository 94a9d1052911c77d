//! # Retrieve It matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the report store (`store`). Given one report it
//! scans the opposite population (lost vs found), scores every active
//! candidate with a fixed list of explainable signals, drops candidates below
//! the threshold and returns the rest ranked best-first.
//!
//! In a typical deployment you will:
//! - Use `ingest` to turn a submission into a [`ingest::Report`] and `store`
//!   to append it.
//! - Use `matcher` right after the save, over a fresh store snapshot.
//!
//! ## Core Types
//!
//! - [`Signal`]: one named, pure evaluator returning an optional
//!   [`SignalHit`]. The standard list is:
//!   - category equality (`Category Match`, +50);
//!   - lower-cased title containment either way (`Title Similarity`, +30);
//!   - dates within 7 days (`Reported within same week`, +20).
//! - [`MatchConfig`]: weights, the 7 day window, `min_score` (40) and an
//!   optional `max_results` cap.
//! - [`Match`]: `reportId`, `matchId`, integer score and the joined reasons.
//! - [`Matcher`]: the engine. [`Matcher::find_matches`] is pure over a
//!   snapshot; [`Matcher::match_report`] reads one from a [`store::ReportStore`].
//!
//! ## Example Usage
//!
//! ```
//! use ingest::{Category, ItemType, Report, ReportStatus};
//! use matcher::Matcher;
//!
//! let mk = |id: &str, item_type, title: &str, date: &str| Report {
//!     id: id.into(),
//!     item_type,
//!     title: title.into(),
//!     description: String::new(),
//!     category: Category::Electronics,
//!     date: date.into(),
//!     location_name: String::new(),
//!     coordinates: None,
//!     contact_name: String::new(),
//!     contact_email: String::new(),
//!     status: ReportStatus::Active,
//!     images: Vec::new(),
//!     reporter_id: None,
//! };
//!
//! let query = mk("q", ItemType::Lost, "Blue iPhone 13", "2024-01-10");
//! let snapshot = vec![mk("f", ItemType::Found, "iPhone", "2024-01-12")];
//!
//! let matches = Matcher::default().find_matches(&query, &snapshot);
//! assert_eq!(matches[0].score, 100);
//! assert_eq!(
//!     matches[0].reason,
//!     "Category Match, Title Similarity, Reported within same week"
//! );
//! ```
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to
//! record per-call latency, candidate and hit counts. Every candidate is
//! also logged at `debug` and every call summarized at `info`.

pub mod engine;
pub mod metrics;
pub mod signal;
pub mod types;

pub use crate::engine::Matcher;
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::signal::{
    days_between, default_signals, parse_report_date, CategorySignal, DateProximitySignal, Signal,
    SignalHit, TitleSignal, CATEGORY_REASON, DATE_REASON, TITLE_REASON,
};
pub use crate::types::{Match, MatchConfig, MatchError};
