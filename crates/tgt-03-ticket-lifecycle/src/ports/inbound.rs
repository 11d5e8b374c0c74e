//! # Inbound Ports (Driving Ports)

use crate::domain::errors::LifecycleError;
use crate::domain::report::SweepReport;
use shared_bus::TicketEventKind;
use shared_types::{Ticket, TicketBuilder, TicketId};

/// Ticket lifecycle API.
pub trait TicketLifecycleApi {
    /// Admission check for a new session.
    ///
    /// ## Errors
    ///
    /// - `QuotaExceeded`: the ticket cap is already reached
    fn create_ticket(&self, builder: TicketBuilder) -> Result<Ticket, LifecycleError>;

    /// Persist one ticket and report the event fired.
    ///
    /// On any error other than `Listener`, nothing was committed and the
    /// ticket is left exactly as it was passed in.
    fn persist(&self, ticket: &mut Ticket) -> Result<TicketEventKind, LifecycleError>;

    /// Persist many tickets in one transaction.
    ///
    /// Either every row change commits or none does. Events fire per group
    /// (CREATE, REMOVE, UPDATE) after the commit.
    fn persist_all(&self, tickets: &mut [Ticket]) -> Result<(), LifecycleError>;

    /// Delete every due ticket, firing EXPIRE for each, and sweep orphaned
    /// aliases.
    fn remove_expired(&self) -> Result<SweepReport, LifecycleError>;

    /// Delete a ticket and its aliases, then fire EXPIRE.
    fn clean(&self, ticket: &Ticket) -> Result<(), LifecycleError>;

    /// Mark a persisted ticket expired now and persist it (REMOVE).
    fn expire_now(&self, ticket: &mut Ticket) -> Result<TicketEventKind, LifecycleError>;

    fn retrieve(&self, id: &TicketId) -> Result<Option<Ticket>, LifecycleError>;

    fn exists(&self, id: &TicketId) -> Result<bool, LifecycleError>;

    /// Live ticket count, for monitoring and back-pressure.
    fn count(&self) -> Result<usize, LifecycleError>;
}
