//! # Domain Errors

use crate::domain::config::AliasRole;
use shared_types::{KVStoreError, SchemaError, TicketId};
use thiserror::Error;

/// Alias Store failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AliasStoreError {
    /// The backing store could not be reached.
    #[error("Alias store unavailable: {message}")]
    Unavailable { message: String },

    /// A stored alias row cannot be decoded.
    #[error("Malformed alias row: {reason}")]
    Malformed { reason: String },

    /// Insert would not create exactly one row.
    #[error("Could not insert alias for ticket {ticket_id} (owner {owner}): {reason}")]
    Insert {
        ticket_id: TicketId,
        owner: String,
        reason: String,
    },

    /// Update would not touch exactly one row.
    #[error("Could not update alias for ticket {ticket_id} (owner {owner}): {reason}")]
    Update {
        ticket_id: TicketId,
        owner: String,
        reason: String,
    },

    /// Write attempted on a disabled store.
    #[error("The {role} alias store is disabled")]
    Disabled { role: AliasRole },

    /// No column is configured for this alias type.
    #[error("Unknown alias type '{alias_type}'")]
    UnknownAliasType { alias_type: String },

    /// Startup table validation failed.
    #[error("Alias table validation failed: {0}")]
    Schema(#[from] SchemaError),
}

impl From<KVStoreError> for AliasStoreError {
    fn from(err: KVStoreError) -> Self {
        AliasStoreError::Unavailable {
            message: err.to_string(),
        }
    }
}
