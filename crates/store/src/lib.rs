//! # Retrieve It report store
//!
//! This crate persists lost and found [`Report`]s as one named collection: a
//! JSON array of report objects stored under a single key of a pluggable
//! [`StorageBackend`].
//!
//! ## Core Features
//!
//! - **Injectable storage**: the [`ReportStore`] trait (`save`, `all`,
//!   `by_id`) is what the matcher and the portal depend on. [`CollectionStore`]
//!   implements it over any backend:
//!   - an in-memory `HashMap` backend for tests and ephemeral deployments;
//!   - a Redb backend for durable on-disk storage (`backend-redb` feature).
//! - **Sanitization on write**: `title` and `description` are stripped to
//!   printable ASCII plus whitespace before they are appended.
//! - **Self-healing reads**: a payload that is not valid JSON, or not a JSON
//!   array, is removed and read as an empty collection. Recovery is logged,
//!   never surfaced, and the store stays writable.
//! - **Serialized appends**: the read-all, append, write-all cycle runs under
//!   a writer lock so concurrent saves cannot lose each other's reports.
//!
//! ## Example Usage
//!
//! ```
//! use store::{BackendConfig, CollectionStore, ReportStore};
//! use ingest::{Category, ItemType, Report, ReportStatus};
//!
//! let store = CollectionStore::new(BackendConfig::in_memory()).unwrap();
//! let report = Report {
//!     id: "r-1".into(),
//!     item_type: ItemType::Lost,
//!     title: "Blue iPhone 13".into(),
//!     description: "Cracked corner".into(),
//!     category: Category::Electronics,
//!     date: "2024-01-10".into(),
//!     location_name: "Library".into(),
//!     coordinates: None,
//!     contact_name: "Alex".into(),
//!     contact_email: "alex@example.com".into(),
//!     status: ReportStatus::Active,
//!     images: Vec::new(),
//!     reporter_id: None,
//! };
//! store.save(report).unwrap();
//!
//! assert_eq!(store.all().unwrap().len(), 1);
//! assert!(store.by_id("r-1").unwrap().is_some());
//! ```

mod backend;

pub use backend::{BackendConfig, InMemoryBackend, StorageBackend};
#[cfg(feature = "backend-redb")]
pub use backend::RedbBackend;

use std::sync::{Mutex, MutexGuard};

use ingest::{sanitize_text, Report};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Name of the collection reports are persisted under.
pub const REPORTS_COLLECTION: &str = "retrieve_it_reports_v2";

/// Errors surfaced by the store.
///
/// Corrupt persisted payloads are never reported through this type; they
/// are recovered from in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("report id '{0}' already exists")]
    DuplicateId(String),
}

impl StoreError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}

/// The storage abstraction the rest of the portal is written against.
pub trait ReportStore: Send + Sync {
    /// Sanitize and append a report, returning the record as stored.
    fn save(&self, report: Report) -> Result<Report, StoreError>;
    /// Every stored report, in insertion order.
    fn all(&self) -> Result<Vec<Report>, StoreError>;
    /// Point lookup by identifier.
    fn by_id(&self, id: &str) -> Result<Option<Report>, StoreError> {
        Ok(self.all()?.into_iter().find(|r| r.id == id))
    }
}

/// Store configuration, as read from the `store:` section of the portal config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default = "StoreConfig::default_collection")]
    pub collection: String,
}

impl StoreConfig {
    fn default_collection() -> String {
        REPORTS_COLLECTION.to_string()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            collection: Self::default_collection(),
        }
    }
}

/// [`ReportStore`] over a single collection key of a [`StorageBackend`].
pub struct CollectionStore {
    backend: Box<dyn StorageBackend>,
    collection: String,
    /// Held across the read-append-write cycle in `save`.
    write_lock: Mutex<()>,
}

impl CollectionStore {
    /// Build the configured backend and use the default collection name.
    pub fn new(backend: BackendConfig) -> Result<Self, StoreError> {
        Ok(Self::with_backend(backend.build()?))
    }

    /// Build from a full [`StoreConfig`].
    pub fn from_config(cfg: &StoreConfig) -> Result<Self, StoreError> {
        Ok(Self::with_backend(cfg.backend.build()?).with_collection(cfg.collection.clone()))
    }

    /// Wrap an existing backend (e.g. an in-memory fake in tests).
    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            collection: REPORTS_COLLECTION.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Read and parse the persisted array. `Ok(Err(reason))` means the
    /// payload is corrupt.
    fn read_items(&self) -> Result<Result<Vec<Value>, String>, StoreError> {
        let Some(bytes) = self.backend.read(&self.collection)? else {
            return Ok(Ok(Vec::new()));
        };

        Ok(match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => Err(format!("expected array, found {}", json_kind(&other))),
            Err(err) => Err(err.to_string()),
        })
    }

    /// Read the persisted array as raw JSON values, healing corruption.
    /// The caller must hold `write_lock`.
    ///
    /// Elements are kept raw so that a save never drops a stored record just
    /// because this build cannot decode it.
    fn load_raw_locked(&self) -> Result<Vec<Value>, StoreError> {
        match self.read_items()? {
            Ok(items) => Ok(items),
            Err(reason) => {
                self.reset(&reason);
                Ok(Vec::new())
            }
        }
    }

    /// Snapshot for readers. Only a corrupt payload takes the writer lock,
    /// and it is re-read under the lock before anything is removed.
    fn load_snapshot(&self) -> Result<Vec<Value>, StoreError> {
        if let Ok(items) = self.read_items()? {
            return Ok(items);
        }
        let _guard = self.lock_writes()?;
        self.load_raw_locked()
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::backend("poisoned write lock"))
    }

    fn reset(&self, reason: &str) {
        warn!(
            collection = %self.collection,
            reason,
            "store_corruption_reset"
        );
        if let Err(err) = self.backend.remove(&self.collection) {
            warn!(collection = %self.collection, error = %err, "store_reset_failed");
        }
    }

    fn persist(&self, items: &[Value]) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(items).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.backend.write(&self.collection, &payload)?;
        self.backend.flush()
    }
}

impl ReportStore for CollectionStore {
    fn save(&self, report: Report) -> Result<Report, StoreError> {
        let _guard = self.lock_writes()?;

        let sanitized = Report {
            title: sanitize_text(&report.title),
            description: sanitize_text(&report.description),
            ..report
        };

        let mut items = self.load_raw_locked()?;
        if items
            .iter()
            .any(|item| item.get("id").and_then(Value::as_str) == Some(sanitized.id.as_str()))
        {
            return Err(StoreError::DuplicateId(sanitized.id));
        }

        let value =
            serde_json::to_value(&sanitized).map_err(|e| StoreError::Encode(e.to_string()))?;
        items.push(value);

        if let Err(err) = self.persist(&items) {
            error!(
                collection = %self.collection,
                report_id = %sanitized.id,
                error = %err,
                "store_save_failed"
            );
            return Err(err);
        }

        debug!(
            collection = %self.collection,
            report_id = %sanitized.id,
            total = items.len(),
            "store_save"
        );
        Ok(sanitized)
    }

    fn all(&self) -> Result<Vec<Report>, StoreError> {
        let items = self.load_snapshot()?;
        let mut reports = Vec::with_capacity(items.len());
        for (position, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Report>(item) {
                Ok(report) => reports.push(report),
                Err(err) => warn!(
                    collection = %self.collection,
                    position,
                    error = %err,
                    "store_skip_unreadable_report"
                ),
            }
        }
        Ok(reports)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
