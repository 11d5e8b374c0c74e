//! # File-Backed Key-Value Store
//!
//! Persists the whole key space to one binary file, providing durability
//! across restarts without a database server. Suitable for single-node
//! deployments and development.
//!
//! Every committed batch rewrites the file through a temp file + rename, so
//! a crash mid-write leaves the previous state intact. A sibling `.lock`
//! file is held exclusively for the lifetime of the store.

use super::kv::{BatchOperation, KeyValueStore};
use crate::errors::KVStoreError;
use fs2::FileExt;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

type Table = BTreeMap<Vec<u8>, Vec<u8>>;

/// File-backed key-value store.
pub struct FileBackedKVStore {
    data: RwLock<Table>,
    path: PathBuf,
    _lock: File,
}

impl std::fmt::Debug for FileBackedKVStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackedKVStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileBackedKVStore {
    /// Open (or create) the store at `path`.
    ///
    /// Fails with `Locked` if another process holds the store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let lock = File::create(path.with_extension("lock")).map_err(io_error)?;
        lock.try_lock_exclusive().map_err(|e| KVStoreError::Locked {
            message: format!("{}: {}", path.display(), e),
        })?;

        let data = match std::fs::read(&path) {
            Ok(bytes) => {
                let data = decode(&bytes)?;
                info!(
                    "[storage] Loaded {} keys from {}",
                    data.len(),
                    path.display()
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[storage] No existing storage file at {}", path.display());
                Table::new()
            }
            Err(e) => return Err(io_error(e)),
        };

        Ok(Self {
            data: RwLock::new(data),
            path,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, data: &Table) -> Result<(), KVStoreError> {
        let bytes = encode(data);

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;

        std::fs::rename(&temp_path, &self.path).map_err(io_error)
    }
}

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}

/// Format: `[key_len:u32 LE][key][value_len:u32 LE][value]...`
fn encode(data: &Table) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (key, value) in data {
        bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
        bytes.extend_from_slice(key);
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value);
    }
    bytes
}

fn decode(bytes: &[u8]) -> Result<Table, KVStoreError> {
    let mut data = Table::new();
    let mut reader = bytes;

    while !reader.is_empty() {
        let key = read_chunk(&mut reader)?;
        let value = read_chunk(&mut reader)?;
        data.insert(key, value);
    }

    Ok(data)
}

fn read_chunk(reader: &mut &[u8]) -> Result<Vec<u8>, KVStoreError> {
    let corrupt = |what: &str| KVStoreError::CorruptionError {
        message: format!("truncated storage file ({what})"),
    };

    let mut len_bytes = [0u8; 4];
    reader
        .read_exact(&mut len_bytes)
        .map_err(|_| corrupt("length"))?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    if reader.len() < len {
        return Err(corrupt("payload"));
    }
    let (chunk, rest) = reader.split_at(len);
    *reader = rest;
    Ok(chunk.to_vec())
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.read().contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        let data = self.data.read();
        Ok(data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut data = self.data.write();

        // Apply to a copy so a failed save leaves memory and disk in agreement
        let mut next = data.clone();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    next.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    next.remove(&key);
                }
            }
        }

        if let Err(e) = self.save(&next) {
            warn!("[storage] Failed to persist batch to {}: {}", self.path.display(), e);
            return Err(e);
        }

        *data = next;
        Ok(())
    }
}
