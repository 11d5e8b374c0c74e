//! # Production Storage Adapters
//!
//! Enable the `rocksdb` feature to use the RocksDB backend:
//!
//! ```toml
//! session-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! The memory and file backends live in `shared-types`.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

pub use shared_types::{FileBackedKVStore, InMemoryKVStore};
