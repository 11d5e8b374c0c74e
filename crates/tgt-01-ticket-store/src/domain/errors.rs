//! # Domain Errors
//!
//! Error types for the Ticket Store.

use shared_types::{KVStoreError, SchemaError, TicketId};
use thiserror::Error;

/// Read path failure. Never a stand-in for "not found".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetrievalError {
    /// The backing store could not be reached (or timed out).
    #[error("Ticket store unavailable: {message}")]
    Unavailable { message: String },

    /// The stored row exists but cannot be decoded.
    #[error("Malformed ticket {id}: {reason}")]
    Malformed { id: TicketId, reason: String },
}

impl From<KVStoreError> for RetrievalError {
    fn from(err: KVStoreError) -> Self {
        RetrievalError::Unavailable {
            message: err.to_string(),
        }
    }
}

/// Write path failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    /// Insert would not create exactly one row.
    #[error("Could not insert ticket {id}: {reason}")]
    Insert { id: TicketId, reason: String },

    /// Update would not touch exactly one row.
    #[error("Could not update ticket {id}: {reason}")]
    Update { id: TicketId, reason: String },

    /// Remove would not delete exactly one row.
    #[error("Could not remove ticket {id}: {reason}")]
    Remove { id: TicketId, reason: String },

    /// A row-level write was attempted for a ticket without an id.
    #[error("Ticket has no identity; it was never persisted")]
    Unidentified,

    /// A field could not be encoded for storage.
    #[error("Could not encode ticket {id}: {reason}")]
    Encoding { id: TicketId, reason: String },

    /// Id generation kept colliding with existing rows.
    #[error("No free ticket id after {attempts} attempts")]
    IdExhausted { attempts: u32 },

    /// The backing store failed while staging or committing.
    #[error("Ticket store write failed: {message}")]
    Store { message: String },
}

impl From<KVStoreError> for PersistenceError {
    fn from(err: KVStoreError) -> Self {
        PersistenceError::Store {
            message: err.to_string(),
        }
    }
}

impl From<RetrievalError> for PersistenceError {
    fn from(err: RetrievalError) -> Self {
        PersistenceError::Store {
            message: err.to_string(),
        }
    }
}

/// Any Ticket Store failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TicketStoreError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Startup table validation failed.
    #[error("Ticket table validation failed: {0}")]
    Schema(#[from] SchemaError),
}
