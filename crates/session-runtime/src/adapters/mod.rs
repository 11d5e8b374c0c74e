//! # Runtime Adapters
//!
//! - `audit` - listener that logs every lifecycle event
//! - `storage` - production key-value backends

pub mod audit;
pub mod storage;

pub use audit::AuditListener;
