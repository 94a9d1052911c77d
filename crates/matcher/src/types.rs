use serde::{Deserialize, Serialize};
use store::StoreError;
use thiserror::Error;

/// Tuning knobs for the matching engine.
///
/// The defaults reproduce the portal's long-standing scoring: category 50,
/// title 30, date 20, a 7 day window and a threshold of 40. A weight of zero
/// disables its signal entirely, reason included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchConfig {
    /// Configuration schema version.
    #[serde(default = "MatchConfig::default_version")]
    pub version: u32,
    /// Minimum total score a candidate needs to become a match (inclusive).
    #[serde(default = "MatchConfig::default_min_score")]
    pub min_score: u32,
    /// Optional cap on returned matches, applied after ranking.
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default = "MatchConfig::default_category_weight")]
    pub category_weight: u32,
    #[serde(default = "MatchConfig::default_title_weight")]
    pub title_weight: u32,
    #[serde(default = "MatchConfig::default_date_weight")]
    pub date_weight: u32,
    /// Inclusive window, in days, for the date proximity signal.
    #[serde(default = "MatchConfig::default_date_window_days")]
    pub date_window_days: u32,
}

impl MatchConfig {
    pub(crate) fn default_version() -> u32 {
        1
    }

    pub(crate) fn default_min_score() -> u32 {
        40
    }

    pub(crate) fn default_category_weight() -> u32 {
        50
    }

    pub(crate) fn default_title_weight() -> u32 {
        30
    }

    pub(crate) fn default_date_weight() -> u32 {
        20
    }

    pub(crate) fn default_date_window_days() -> u32 {
        7
    }

    /// Highest score any candidate can reach under this configuration.
    pub fn max_score(&self) -> u32 {
        self.category_weight
            .saturating_add(self.title_weight)
            .saturating_add(self.date_weight)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        self.validate_limits()?;
        if self.max_score() == 0 {
            return Err(MatchError::InvalidConfig(
                "at least one signal weight must be non-zero".into(),
            ));
        }
        if self.min_score > self.max_score() {
            return Err(MatchError::InvalidConfig(format!(
                "min_score {} exceeds the maximum reachable score {}",
                self.min_score,
                self.max_score()
            )));
        }
        Ok(())
    }

    /// Checks that hold whatever signals are scoring.
    pub(crate) fn validate_limits(&self) -> Result<(), MatchError> {
        if self.version == 0 {
            return Err(MatchError::InvalidConfig(
                "version must be greater than zero".into(),
            ));
        }
        if self.max_results == Some(0) {
            return Err(MatchError::InvalidConfig(
                "max_results must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            min_score: Self::default_min_score(),
            max_results: None,
            category_weight: Self::default_category_weight(),
            title_weight: Self::default_title_weight(),
            date_weight: Self::default_date_weight(),
            date_window_days: Self::default_date_window_days(),
        }
    }
}

/// A candidate pairing between a query report and an opposite-type report.
///
/// Computed fresh on every call and never persisted. `id` is random and
/// carries no meaning; the rest is deterministic for a given snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    /// Id of the report the search was run for.
    pub report_id: String,
    /// Id of the candidate report.
    pub match_id: String,
    pub score: u32,
    /// Contributing signal names, in evaluation order, joined with ", ".
    pub reason: String,
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid engine configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// Reading the store snapshot failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = MatchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_score(), 100);
        assert_eq!(cfg.min_score, 40);
        assert_eq!(cfg.date_window_days, 7);
    }

    #[test]
    fn zero_max_results_rejected() {
        let cfg = MatchConfig {
            max_results: Some(0),
            ..MatchConfig::default()
        };
        match cfg.validate() {
            Err(MatchError::InvalidConfig(msg)) => assert!(msg.contains("max_results")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unreachable_threshold_rejected() {
        let cfg = MatchConfig {
            min_score: 101,
            ..MatchConfig::default()
        };
        match cfg.validate() {
            Err(MatchError::InvalidConfig(msg)) => assert!(msg.contains("min_score")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn all_zero_weights_rejected() {
        let cfg = MatchConfig {
            min_score: 0,
            category_weight: 0,
            title_weight: 0,
            date_weight: 0,
            ..MatchConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: MatchConfig = serde_json::from_str(r#"{ "min_score": 50 }"#).unwrap();
        assert_eq!(cfg.min_score, 50);
        assert_eq!(cfg.category_weight, 50);
        assert_eq!(cfg.max_results, None);
    }

    #[test]
    fn match_serializes_camel_case() {
        let m = Match {
            id: "m-abcde".into(),
            report_id: "q".into(),
            match_id: "c".into(),
            score: 80,
            reason: "Category Match, Title Similarity".into(),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["reportId"], "q");
        assert_eq!(json["matchId"], "c");
        assert_eq!(json["score"], 80);
    }
}
