//! # Shared Types Crate
//!
//! This crate contains the ticket entity and the storage plumbing shared by
//! every subsystem of the session core.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Ticket` is defined once and passed by value
//!   between the stores, the lifecycle manager and the logout protocol.
//! - **Store-Agnostic**: subsystems only talk to the `KeyValueStore` port;
//!   tables, rows and indexes are key layouts on top of it.
//! - **Caller-Owned Transactions**: stores never commit on their own. A
//!   `StoreTransaction` is opened by the orchestrating service and shared by
//!   every store touched in one ticket transition.

pub mod entities;
pub mod errors;
pub mod storage;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use storage::{
    key, BatchOperation, FileBackedKVStore, InMemoryKVStore, KeyValueStore, StoreTransaction,
    TableProbe, TableSchema, TicketPresence,
};
pub use time::{ManualClock, SystemTimeSource, TimeSource, Timestamp};
