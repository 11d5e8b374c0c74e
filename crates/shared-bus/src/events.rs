//! # Ticket Events
//!
//! Lifecycle transitions announced to listeners.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle transition of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketEventKind {
    /// First persist assigned an id.
    Create,
    /// A persisted ticket was renewed.
    Update,
    /// An expired ticket was persisted and deleted.
    Remove,
    /// The ticket is being swept or cleaned; its row is about to vanish.
    Expire,
}

impl TicketEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketEventKind::Create => "CREATE",
            TicketEventKind::Update => "UPDATE",
            TicketEventKind::Remove => "REMOVE",
            TicketEventKind::Expire => "EXPIRE",
        }
    }
}

impl fmt::Display for TicketEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
