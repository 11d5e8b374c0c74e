//! # Listener Doubles
//!
//! Listeners for exercising dispatch from other crates' tests.

use crate::events::TicketEventKind;
use crate::listener::{ListenerError, ListenerErrorCode, TicketListener};
use parking_lot::Mutex;
use shared_types::{Ticket, TicketId};

/// Records every event it receives, in order.
#[derive(Debug)]
pub struct RecordingListener {
    name: String,
    events: Mutex<Vec<(TicketEventKind, Ticket)>>,
}

impl RecordingListener {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Every (event, ticket state) pair received so far.
    pub fn events(&self) -> Vec<(TicketEventKind, Ticket)> {
        self.events.lock().clone()
    }

    /// Event kinds only.
    pub fn kinds(&self) -> Vec<TicketEventKind> {
        self.events.lock().iter().map(|(kind, _)| *kind).collect()
    }

    /// Ticket ids that received `kind`, in order.
    pub fn ids_for(&self, kind: TicketEventKind) -> Vec<TicketId> {
        self.events
            .lock()
            .iter()
            .filter(|(k, _)| *k == kind)
            .filter_map(|(_, ticket)| ticket.id().cloned())
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl TicketListener for RecordingListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, kind: TicketEventKind, ticket: &Ticket) -> Result<(), ListenerError> {
        self.events.lock().push((kind, ticket.clone()));
        Ok(())
    }
}

/// Fails with a fixed code, optionally only for one event kind.
#[derive(Debug)]
pub struct FailingListener {
    name: String,
    code: ListenerErrorCode,
    only: Option<TicketEventKind>,
}

impl FailingListener {
    pub fn new(name: impl Into<String>, code: ListenerErrorCode) -> Self {
        Self {
            name: name.into(),
            code,
            only: None,
        }
    }

    /// Succeed for every event except `kind`.
    pub fn only_for(mut self, kind: TicketEventKind) -> Self {
        self.only = Some(kind);
        self
    }
}

impl TicketListener for FailingListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, kind: TicketEventKind, _ticket: &Ticket) -> Result<(), ListenerError> {
        match self.only {
            Some(only) if only != kind => Ok(()),
            _ => Err(ListenerError::new(
                self.code,
                format!("{} rejected {}", self.name, kind),
            )),
        }
    }
}
