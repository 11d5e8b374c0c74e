//! # Error Types
//!
//! Errors shared across subsystems: the storage SPI and the ticket entity.

use crate::entities::TicketId;
use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write (connectivity, disk, timeout).
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    /// The store is held by another process.
    #[error("KV store locked: {message}")]
    Locked { message: String },
}

/// Table catalog / startup probe failures. Fatal at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The probed table has never been provisioned.
    #[error("Table '{table}' does not exist")]
    MissingTable { table: String },

    /// The probed table lacks a configured column.
    #[error("Column '{column}' does not exist in table '{table}'")]
    MissingColumn { table: String, column: String },

    /// The override probe could not be parsed.
    #[error("Invalid validation probe '{probe}': {reason}")]
    InvalidProbe { probe: String, reason: String },

    /// The catalog could not be read.
    #[error("Schema probe failed: {0}")]
    Store(#[from] KVStoreError),
}

/// Ticket entity misuse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TicketError {
    /// `id` is immutable once assigned.
    #[error("Ticket already has identity {id}")]
    IdentityAlreadyAssigned { id: TicketId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::MissingColumn {
            table: "tgt_alias".into(),
            column: "session_index".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("session_index"));
        assert!(msg.contains("tgt_alias"));
    }

    #[test]
    fn test_kv_error_conversion() {
        let kv_err = KVStoreError::IOError {
            message: "disk failure".to_string(),
        };
        let schema_err: SchemaError = kv_err.into();
        assert!(matches!(schema_err, SchemaError::Store(KVStoreError::IOError { .. })));
        assert!(schema_err.to_string().contains("disk failure"));
    }
}
