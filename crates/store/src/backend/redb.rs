//! Redb (Rust embedded database) backend for report persistence.
//!
//! Each collection lives under one key of a single table, so a save is one
//! ACID write transaction replacing the whole serialized collection.
//!
//! # Configuration Example
//! ```yaml
//! store:
//!   backend:
//!     kind: redb
//!     path: "/data/retrieveit.redb"
//! ```

use crate::{StorageBackend, StoreError};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Table holding every persisted collection, keyed by collection name.
const COLLECTIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("collections");

/// Redb backend implementation for persistent key-value storage.
///
/// The `Arc<Database>` wrapper allows safe sharing across threads; redb
/// handles its own internal locking and MVCC.
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Open or create a Redb database at the given path.
    ///
    /// ```no_run
    /// use store::RedbBackend;
    ///
    /// let backend = RedbBackend::open("/tmp/reports.redb").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(StoreError::backend)?;

        // Accessing the table inside a write transaction creates it.
        let write_txn = db.begin_write().map_err(StoreError::backend)?;
        {
            let _table = write_txn
                .open_table(COLLECTIONS_TABLE)
                .map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl StorageBackend for RedbBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self.db.begin_read().map_err(StoreError::backend)?;
        let table = read_txn
            .open_table(COLLECTIONS_TABLE)
            .map_err(StoreError::backend)?;

        match table.get(key).map_err(StoreError::backend)? {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(StoreError::backend)?;
        {
            let mut table = write_txn
                .open_table(COLLECTIONS_TABLE)
                .map_err(StoreError::backend)?;
            table.insert(key, value).map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(StoreError::backend)?;
        {
            let mut table = write_txn
                .open_table(COLLECTIONS_TABLE)
                .map_err(StoreError::backend)?;
            table.remove(key).map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;
        Ok(())
    }
}
