//! # Storage SPI
//!
//! Outbound port every store in the session core is written against, plus
//! the pieces that turn a flat key-value store into "tables":
//!
//! - `kv` - the `KeyValueStore` port and `BatchOperation`
//! - `key` - NUL-separated composite key layout
//! - `transaction` - `StoreTransaction`, the caller-owned unit of work
//! - `schema` - table catalog and the startup validation probe
//! - `memory` / `file` - adapters for tests and single-node deployments
//!
//! Production: `RocksDbStore` (session-runtime, feature `rocksdb`).

pub mod file;
pub mod key;
pub mod kv;
pub mod memory;
pub mod schema;
pub mod transaction;

pub use file::FileBackedKVStore;
pub use kv::{BatchOperation, KeyValueStore};
pub use memory::InMemoryKVStore;
pub use schema::{TableProbe, TableSchema};
pub use transaction::StoreTransaction;

use crate::entities::TicketId;
use crate::errors::KVStoreError;

/// Answers "does this ticket row still exist?" inside a transaction.
///
/// Implemented by the ticket store; used by alias stores to find orphans
/// without depending on the ticket store crate.
pub trait TicketPresence: Send + Sync {
    fn ticket_exists(&self, tx: &StoreTransaction<'_>, id: &TicketId)
        -> Result<bool, KVStoreError>;
}
