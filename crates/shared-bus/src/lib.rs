//! # Shared Bus - Ticket Lifecycle Event Dispatch
//!
//! Fans ticket lifecycle transitions out to every registered listener
//! (audit logging, federation notification, ...).
//!
//! ## Dispatch Rules
//!
//! - Listeners are invoked in registration order.
//! - A failing listener never stops dispatch to the remaining listeners.
//! - Failures are collected into one `DispatchError`, ordered as raised.
//! - Dispatch happens after the row-level write committed; a `DispatchError`
//!   is a report, never a reason to roll back.
//!
//! ```text
//!   Lifecycle ──dispatch(kind, ticket)──→ ┌──────────────┐
//!                                         │  Registry    │──→ listener 1
//!                                         │  (ordered)   │──→ listener 2 ✗ PARTIALLY_FAILED
//!                                         └──────────────┘──→ listener 3 ✗ FAILED
//!                                                │
//!                          DispatchError [2: PARTIALLY_FAILED, 3: FAILED]
//!                                                │
//!                              classify() ──→ DispatchOutcome::Failed
//! ```

pub mod events;
pub mod listener;
pub mod outcome;
pub mod registry;
pub mod testing;

// Re-export main types
pub use events::TicketEventKind;
pub use listener::{ListenerError, ListenerErrorCode, TicketListener};
pub use outcome::DispatchOutcome;
pub use registry::{DispatchError, ListenerFailure, ListenerRegistry};
