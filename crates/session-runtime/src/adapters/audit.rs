//! # Audit Listener
//!
//! Writes one structured log line per lifecycle event. Never fails.

use parking_lot::Mutex;
use shared_bus::{ListenerError, TicketEventKind, TicketListener};
use shared_types::Ticket;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Default)]
pub struct AuditListener {
    counts: Mutex<HashMap<TicketEventKind, u64>>,
}

impl AuditListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of `kind` seen so far.
    pub fn count(&self, kind: TicketEventKind) -> u64 {
        self.counts.lock().get(&kind).copied().unwrap_or(0)
    }

    pub fn events_seen(&self) -> u64 {
        self.counts.lock().values().sum()
    }
}

impl TicketListener for AuditListener {
    fn name(&self) -> &str {
        "audit"
    }

    fn on_event(&self, kind: TicketEventKind, ticket: &Ticket) -> Result<(), ListenerError> {
        *self.counts.lock().entry(kind).or_default() += 1;
        info!(
            event = %kind,
            ticket_id = ticket.id().map(|id| id.as_str()).unwrap_or("-"),
            uid = %ticket.user().uid,
            requestors = ticket.requestor_ids().len(),
            expires = ticket.expiration_time(),
            "[audit] Ticket event"
        );
        Ok(())
    }
}
