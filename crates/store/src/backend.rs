use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Trait for the key-value storage a report collection is persisted in.
/// This allows for different storage implementations (e.g., in-memory, Redb).
pub trait StorageBackend: Send + Sync {
    /// Retrieve the raw bytes stored under `key`.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    /// Remove `key` entirely. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    /// Flush any buffered writes to the backend.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Configuration for selecting and building a backend.
///
/// # Example
/// ```
/// use store::BackendConfig;
///
/// // In-memory (for testing)
/// let config = BackendConfig::in_memory();
///
/// // Redb (pure Rust, on disk)
/// let config = BackendConfig::redb("/data/retrieveit.redb");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Use Redb for storage. The `path` is the file path for the database.
    ///
    /// Requires the `backend-redb` feature (enabled by default).
    Redb { path: String },
    /// Use an in-memory HashMap for storage. Contents vanish with the process.
    #[default]
    InMemory,
}

impl BackendConfig {
    /// Create an in-memory backend configuration.
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    /// Create a Redb backend configuration.
    pub fn redb<P: Into<String>>(path: P) -> Self {
        BackendConfig::Redb { path: path.into() }
    }

    /// Build the backend based on the configuration.
    ///
    /// Each backend type is only available if its feature flag is enabled
    /// at compile time.
    pub fn build(&self) -> Result<Box<dyn StorageBackend>, StoreError> {
        match self {
            BackendConfig::InMemory => Ok(Box::new(InMemoryBackend::new())),
            BackendConfig::Redb { path } => {
                #[cfg(feature = "backend-redb")]
                {
                    Ok(Box::new(RedbBackend::open(path)?))
                }
                #[cfg(not(feature = "backend-redb"))]
                {
                    let _ = path;
                    Err(StoreError::backend("redb backend disabled at compile time"))
                }
            }
        }
    }
}

/// An in-memory backend using a `RwLock` around a `HashMap`.
pub struct InMemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .remove(key);
        Ok(())
    }
}

#[cfg(feature = "backend-redb")]
pub mod redb;

#[cfg(feature = "backend-redb")]
pub use self::redb::RedbBackend;
