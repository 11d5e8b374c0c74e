//! # Store Transaction
//!
//! Unit of work shared by every store touched in one ticket transition.
//!
//! ```text
//!   begin() ──→ put/delete (staged, visible to reads through this tx)
//!      │
//!      ├── commit()  ──→ one atomic_batch_write, all or nothing
//!      └── drop      ──→ rollback, nothing reaches the store
//! ```

use super::kv::{BatchOperation, KeyValueStore};
use crate::errors::KVStoreError;
use std::collections::BTreeMap;
use tracing::debug;

/// Staged writes over a committed key-value store.
pub struct StoreTransaction<'a> {
    store: &'a dyn KeyValueStore,
    /// `Some(value)` = staged put, `None` = staged delete.
    staged: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
    finished: bool,
}

impl<'a> StoreTransaction<'a> {
    /// Open a transaction against `store`.
    pub fn begin(store: &'a dyn KeyValueStore) -> Self {
        Self {
            store,
            staged: BTreeMap::new(),
            finished: false,
        }
    }

    /// Read through the staged writes.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        match self.staged.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.store.get(key),
        }
    }

    pub fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        match self.staged.get(key) {
            Some(staged) => Ok(staged.is_some()),
            None => self.store.exists(key),
        }
    }

    /// Prefix scan of the committed store merged with staged writes.
    pub fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.store.prefix_scan(prefix)?.into_iter().collect();

        for (key, staged) in self.staged.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match staged {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }

    /// Stage a put.
    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.staged.insert(key.into(), Some(value.into()));
    }

    /// Stage a delete.
    pub fn delete(&mut self, key: impl Into<Vec<u8>>) {
        self.staged.insert(key.into(), None);
    }

    /// Number of keys with staged writes.
    pub fn pending_writes(&self) -> usize {
        self.staged.len()
    }

    /// Apply every staged write atomically. Returns the number of keys written.
    pub fn commit(mut self) -> Result<usize, KVStoreError> {
        self.finished = true;
        let staged = std::mem::take(&mut self.staged);
        let count = staged.len();
        if count == 0 {
            return Ok(0);
        }

        let operations = staged
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOperation::put(key, value),
                None => BatchOperation::delete(key),
            })
            .collect();

        self.store.atomic_batch_write(operations)?;
        Ok(count)
    }

    /// Discard every staged write.
    pub fn rollback(mut self) {
        self.finished = true;
        let discarded = self.staged.len();
        self.staged.clear();
        if discarded > 0 {
            debug!(discarded, "Store transaction rolled back");
        }
    }
}

impl Drop for StoreTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished && !self.staged.is_empty() {
            debug!(
                discarded = self.staged.len(),
                "Store transaction dropped without commit, rolled back"
            );
        }
    }
}
