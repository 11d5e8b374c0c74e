//! # Ticket Listener
//!
//! Subscriber side of the dispatcher. Implemented by external subsystems.

use crate::events::TicketEventKind;
use shared_types::Ticket;
use std::fmt;
use thiserror::Error;

/// Classification carried by a listener failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerErrorCode {
    /// The listener did part of its work (e.g. some parties notified).
    PartiallyFailed,
    /// The listener's work is still running (e.g. asynchronous logout).
    InProgress,
    /// The listener failed outright.
    Failed,
}

impl fmt::Display for ListenerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerErrorCode::PartiallyFailed => f.write_str("PARTIALLY_FAILED"),
            ListenerErrorCode::InProgress => f.write_str("IN_PROGRESS"),
            ListenerErrorCode::Failed => f.write_str("FAILED"),
        }
    }
}

/// Typed failure raised by one listener.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ListenerError {
    pub code: ListenerErrorCode,
    pub message: String,
}

impl ListenerError {
    pub fn new(code: ListenerErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn partially_failed(message: impl Into<String>) -> Self {
        Self::new(ListenerErrorCode::PartiallyFailed, message)
    }

    pub fn in_progress(message: impl Into<String>) -> Self {
        Self::new(ListenerErrorCode::InProgress, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ListenerErrorCode::Failed, message)
    }
}

/// Receives ticket lifecycle events.
pub trait TicketListener: Send + Sync {
    /// Name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Handle one event. The ticket reflects its state at the transition.
    fn on_event(&self, kind: TicketEventKind, ticket: &Ticket) -> Result<(), ListenerError>;
}
