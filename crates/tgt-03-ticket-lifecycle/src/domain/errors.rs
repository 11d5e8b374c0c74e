//! # Domain Errors

use shared_bus::DispatchError;
use shared_types::TicketError;
use thiserror::Error;
use tgt_01_ticket_store::{PersistenceError, RetrievalError};
use tgt_02_alias_store::AliasStoreError;

/// Ticket Lifecycle Manager failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// Reading ticket state failed.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Staging or committing a write failed; nothing was committed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Admitting another ticket would exceed the configured cap.
    #[error("Ticket cap reached: {current} live, maximum {max}")]
    QuotaExceeded { max: usize, current: usize },

    /// The write committed but one or more listeners failed.
    #[error("Ticket persisted, but listeners failed: {0}")]
    Listener(#[from] DispatchError),

    #[error(transparent)]
    Alias(#[from] AliasStoreError),

    #[error(transparent)]
    Ticket(#[from] TicketError),
}

impl LifecycleError {
    /// True when the data layer is consistent and only reporting failed.
    pub fn is_committed(&self) -> bool {
        matches!(self, LifecycleError::Listener(_))
    }
}
