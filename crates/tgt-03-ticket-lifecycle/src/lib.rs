//! # Ticket Lifecycle Manager (tgt-03)
//!
//! Orchestrates every ticket transition. Each operation opens one
//! `StoreTransaction`, stages ticket rows and alias rows of both roles into
//! it, commits, and only then dispatches lifecycle events.
//!
//! ## Transitions
//!
//! ```text
//!   persist(ticket)
//!     id == None      → generate id, assign expiry, insert      → CREATE
//!     is_expired(now) → delete row + aliases (both roles)       → REMOVE
//!     otherwise       → renew expiry, update                    → UPDATE
//!
//!   remove_expired()  → EXPIRE per due row, delete, sweep orphaned aliases
//!   clean(ticket)     → delete row + aliases                    → EXPIRE
//! ```
//!
//! A listener failure never undoes a committed write; it is returned as
//! `LifecycleError::Listener` after the commit.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::id_generator::{RandomTicketIdGenerator, SequenceIdGenerator};
pub use adapters::locks::{TicketGuard, TicketLocks};
pub use domain::config::LifecycleConfig;
pub use domain::errors::LifecycleError;
pub use domain::report::SweepReport;
pub use ports::inbound::TicketLifecycleApi;
pub use ports::outbound::TicketIdGenerator;
pub use service::{LifecycleDependencies, TicketLifecycleManager};
