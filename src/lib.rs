//! Workspace umbrella crate for the Retrieve It lost & found portal.
//!
//! This crate wires intake, the report store and the matcher into a single
//! submit flow so callers (the CLI, the HTTP server, tests) work against one
//! entry point: [`Portal`].
//!
//! A submission runs intake first; a draft that fails validation is
//! rejected. The report is then appended to the store. A failed save is
//! logged and reported as `persisted: false` but does not abort the flow:
//! matches are still computed from a fresh store snapshot.
//!
//! ```
//! use retrieveit::{Portal, PortalConfig, ItemType, ReportDraft};
//!
//! let portal = Portal::from_config(&PortalConfig::default()).unwrap();
//!
//! let mut found = ReportDraft::new(ItemType::Found);
//! found.title = "iPhone".into();
//! found.date = "2024-01-12".into();
//! found.contact_email = "finder@example.com".into();
//! portal.submit(found).unwrap();
//!
//! let mut lost = ReportDraft::new(ItemType::Lost);
//! lost.title = "Blue iPhone 13".into();
//! lost.date = "2024-01-10".into();
//! lost.contact_email = "owner@example.com".into();
//! let outcome = portal.submit(lost).unwrap();
//!
//! assert!(outcome.persisted);
//! assert_eq!(outcome.matches[0].score, 100);
//! ```

pub mod config;

pub use assist::{
    enhance_or_original, search_or_unavailable, AssistConfig, AssistError, AssistServices,
    DescriptionEnhancer, LocationLink, LocationLookup, LocationSearch,
};
pub use config::{ConfigLoadError, PortalConfig};
pub use ingest::{
    ingest_report, sanitize_text, Category, Coordinates, IngestConfig, IngestError, ItemType,
    Report, ReportDraft, ReportStatus,
};
pub use matcher::{set_match_metrics, Match, MatchConfig, MatchError, MatchMetrics, Matcher};
pub use store::{
    BackendConfig, CollectionStore, InMemoryBackend, ReportStore, StorageBackend, StoreConfig,
    StoreError, REPORTS_COLLECTION,
};
#[cfg(feature = "backend-redb")]
pub use store::RedbBackend;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors surfaced by [`Portal`] operations.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("ingest failure: {0}")]
    Ingest(#[from] IngestError),
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
    #[error("match failure: {0}")]
    Match(#[from] MatchError),
    #[error("assist failure: {0}")]
    Assist(#[from] AssistError),
    #[error("config failure: {0}")]
    Config(#[from] ConfigLoadError),
}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    /// The report as accepted by intake (and, when persisted, as stored).
    pub report: Report,
    /// Candidates from the opposite population, best first.
    pub matches: Vec<Match>,
    /// Whether the report made it into the store.
    pub persisted: bool,
    /// Why the save failed, when it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_error: Option<String>,
}

/// Optional filters for listing reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    #[serde(default, rename = "type")]
    pub item_type: Option<ItemType>,
    #[serde(default)]
    pub status: Option<ReportStatus>,
}

impl ReportFilter {
    pub fn accepts(&self, report: &Report) -> bool {
        self.item_type.is_none_or(|t| report.item_type == t)
            && self.status.is_none_or(|s| report.status == s)
    }
}

/// The submit flow and read side of the portal.
pub struct Portal {
    ingest_cfg: IngestConfig,
    store: Arc<dyn ReportStore>,
    matcher: Matcher,
    assist: AssistServices,
}

impl Portal {
    /// Build every layer from a validated [`PortalConfig`].
    pub fn from_config(cfg: &PortalConfig) -> Result<Self, PortalError> {
        cfg.validate()?;
        let store = CollectionStore::from_config(&cfg.store)?;
        let matcher = Matcher::new(cfg.matcher.clone())?;
        let assist = AssistServices::from_config(&cfg.assist)?;
        info!(
            backend = ?cfg.store.backend,
            collection = %cfg.store.collection,
            min_score = cfg.matcher.min_score,
            "portal_ready"
        );
        Ok(Self::new(cfg.ingest.clone(), Arc::new(store), matcher).with_assist(assist))
    }

    /// Assemble a portal from parts. Assist starts disabled.
    pub fn new(ingest_cfg: IngestConfig, store: Arc<dyn ReportStore>, matcher: Matcher) -> Self {
        Self {
            ingest_cfg,
            store,
            matcher,
            assist: AssistServices::disabled(),
        }
    }

    pub fn with_assist(mut self, assist: AssistServices) -> Self {
        self.assist = assist;
        self
    }

    pub fn store(&self) -> &Arc<dyn ReportStore> {
        &self.store
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn assist(&self) -> &AssistServices {
        &self.assist
    }

    /// Intake, save, then match against a fresh snapshot.
    ///
    /// Only intake failures are returned as errors.
    pub fn submit(&self, draft: ReportDraft) -> Result<SubmitOutcome, PortalError> {
        let report = ingest_report(draft, &self.ingest_cfg)?;

        let (report, persisted, store_error) = match self.store.save(report.clone()) {
            Ok(stored) => (stored, true, None),
            Err(err) => {
                error!(report_id = %report.id, error = %err, "submit_save_failed");
                (report, false, Some(err.to_string()))
            }
        };

        let matches = match self.matcher.match_report(self.store.as_ref(), &report) {
            Ok(matches) => matches,
            Err(err) => {
                warn!(report_id = %report.id, error = %err, "submit_match_failed");
                Vec::new()
            }
        };

        info!(
            report_id = %report.id,
            item_type = %report.item_type,
            persisted,
            matches = matches.len(),
            "submit_complete"
        );

        Ok(SubmitOutcome {
            report,
            matches,
            persisted,
            store_error,
        })
    }

    /// [`Portal::submit`] after running the description through the
    /// enhancer. Enhancement failures keep the original description.
    pub async fn submit_enhanced(
        &self,
        mut draft: ReportDraft,
    ) -> Result<SubmitOutcome, PortalError> {
        if let Some(item_type) = draft.item_type {
            if !draft.description.trim().is_empty() {
                let enhancer = self.assist.enhancer.as_ref();
                draft.description =
                    enhance_or_original(enhancer, &draft.description, item_type).await;
            }
        }
        self.submit(draft)
    }

    /// Stored reports in insertion order, filtered.
    pub fn reports(&self, filter: &ReportFilter) -> Result<Vec<Report>, PortalError> {
        Ok(self
            .store
            .all()?
            .into_iter()
            .filter(|r| filter.accepts(r))
            .collect())
    }

    pub fn report(&self, id: &str) -> Result<Option<Report>, PortalError> {
        Ok(self.store.by_id(id)?)
    }

    /// Matches for a stored report, or `None` when the id is unknown.
    pub fn matches_for(&self, id: &str) -> Result<Option<Vec<Match>>, PortalError> {
        let Some(report) = self.store.by_id(id)? else {
            return Ok(None);
        };
        Ok(Some(self.matcher.match_report(self.store.as_ref(), &report)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(item_type: ItemType, title: &str, category: Category, date: &str) -> ReportDraft {
        ReportDraft {
            item_type: Some(item_type),
            title: title.into(),
            category,
            date: date.into(),
            contact_email: "someone@example.com".into(),
            ..Default::default()
        }
    }

    fn portal() -> Portal {
        let cfg = PortalConfig {
            assist: AssistConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        Portal::from_config(&cfg).unwrap()
    }

    #[test]
    fn submit_persists_and_matches() {
        let portal = portal();
        let found = portal
            .submit(draft(ItemType::Found, "iPhone", Category::Electronics, "2024-01-12"))
            .unwrap();
        assert!(found.persisted);
        assert!(found.matches.is_empty());

        let lost = portal
            .submit(draft(ItemType::Lost, "Blue iPhone 13", Category::Electronics, "2024-01-10"))
            .unwrap();
        assert_eq!(lost.matches.len(), 1);
        assert_eq!(lost.matches[0].match_id, found.report.id);
        assert_eq!(lost.matches[0].report_id, lost.report.id);
        assert_eq!(portal.reports(&ReportFilter::default()).unwrap().len(), 2);
    }

    #[test]
    fn invalid_draft_is_rejected_before_save() {
        let portal = portal();
        let bad = ReportDraft {
            item_type: None,
            ..draft(ItemType::Lost, "Keys", Category::Keys, "2024-01-01")
        };
        assert!(matches!(
            portal.submit(bad),
            Err(PortalError::Ingest(IngestError::MissingType))
        ));
        assert!(portal.reports(&ReportFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn duplicate_id_is_reported_not_fatal() {
        let portal = portal();
        let mut first = draft(ItemType::Found, "Keys", Category::Keys, "2024-01-01");
        first.id = Some("fixed".into());
        portal.submit(first.clone()).unwrap();

        let outcome = portal.submit(first).unwrap();
        assert!(!outcome.persisted);
        assert!(outcome.store_error.unwrap().contains("fixed"));
        assert_eq!(portal.reports(&ReportFilter::default()).unwrap().len(), 1);
    }

    #[test]
    fn filter_by_type_and_status() {
        let portal = portal();
        portal
            .submit(draft(ItemType::Found, "Keys", Category::Keys, "2024-01-01"))
            .unwrap();
        let mut resolved = draft(ItemType::Lost, "Wallet", Category::WalletsAndBags, "2024-01-01");
        resolved.status = Some(ReportStatus::Resolved);
        portal.submit(resolved).unwrap();

        let lost = ReportFilter {
            item_type: Some(ItemType::Lost),
            status: None,
        };
        assert_eq!(portal.reports(&lost).unwrap().len(), 1);

        let active = ReportFilter {
            item_type: None,
            status: Some(ReportStatus::Active),
        };
        let reports = portal.reports(&active).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].title, "Keys");
    }

    #[test]
    fn matches_for_unknown_id_is_none() {
        let portal = portal();
        assert!(portal.matches_for("missing").unwrap().is_none());
    }

    #[tokio::test]
    async fn submit_enhanced_keeps_description_when_assist_disabled() {
        let portal = portal();
        let mut d = draft(ItemType::Lost, "Scarf", Category::Other, "2024-01-01");
        d.description = "red wool".into();
        let outcome = portal.submit_enhanced(d).await.unwrap();
        assert_eq!(outcome.report.description, "red wool");
    }
}
