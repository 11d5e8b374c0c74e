//! # Session Runtime Library
//!
//! Exposes the runtime's modules for testing. The entry point is the
//! `main.rs` binary.
//!
//! ## Modules
//!
//! - `container/` - configuration and dependency wiring (`SessionCore`)
//! - `adapters/` - audit listener, production storage backends
//! - `handlers/` - background tasks (expiry cleaner)

#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod container;
pub mod handlers;

pub use adapters::AuditListener;
pub use container::config::{ConfigError, SessionConfig, StorageBackend};
pub use container::{CoreError, SessionCore, SharedStore};
pub use handlers::ExpiryCleaner;
