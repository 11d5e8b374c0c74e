//! # Inbound Ports (Driving Ports)
//!
//! Read API of the Ticket Store. Writes go through `TicketStore` methods
//! that take a `StoreTransaction`, because only the lifecycle manager may
//! stage them.

use crate::domain::errors::RetrievalError;
use shared_types::{Ticket, TicketId};

/// Read-side API for the Ticket Store.
pub trait TicketStoreApi {
    /// True iff a row with this id exists.
    ///
    /// ## Errors
    ///
    /// - `Unavailable`: backing store unreachable
    fn exists(&self, id: &TicketId) -> Result<bool, RetrievalError>;

    /// Load every persisted field of a ticket.
    ///
    /// ## Errors
    ///
    /// - `Unavailable`: backing store unreachable
    /// - `Malformed`: the stored row cannot be decoded
    fn retrieve(&self, id: &TicketId) -> Result<Option<Ticket>, RetrievalError>;

    /// Number of ticket rows.
    fn count(&self) -> Result<usize, RetrievalError>;
}
