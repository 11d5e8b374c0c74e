//! # Listener Registry
//!
//! Ordered subscriber list and the dispatch loop.
//!
//! Registration happens at startup/shutdown; dispatch takes a snapshot of the
//! list so listeners never run under the registry lock.

use crate::events::TicketEventKind;
use crate::listener::{ListenerError, TicketListener};
use parking_lot::RwLock;
use shared_types::{Ticket, TicketId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// One listener's failure during one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    pub listener: String,
    pub event: TicketEventKind,
    pub ticket_id: Option<TicketId>,
    pub error: ListenerError,
}

/// Aggregate of every listener failure raised during dispatch.
///
/// Raised only after the underlying row mutation committed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{} listener failure(s) during ticket event dispatch", .failures.len())]
pub struct DispatchError {
    pub failures: Vec<ListenerFailure>,
}

impl DispatchError {
    /// Append another aggregate, keeping raise order.
    pub fn merge(&mut self, other: DispatchError) {
        self.failures.extend(other.failures);
    }

    /// Fold per-group dispatch results into one aggregate, or `None` if every
    /// group dispatched cleanly.
    pub fn combine(errors: impl IntoIterator<Item = DispatchError>) -> Option<DispatchError> {
        errors.into_iter().reduce(|mut acc, next| {
            acc.merge(next);
            acc
        })
    }
}

/// Ordered list of ticket listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn TicketListener>>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.names())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener to the end of the dispatch order.
    pub fn add_listener(&self, listener: Arc<dyn TicketListener>) {
        debug!(listener = listener.name(), "[bus] Listener registered");
        self.listeners.write().push(listener);
    }

    /// Remove a previously added listener (matched by identity).
    pub fn remove_listener(&self, listener: &Arc<dyn TicketListener>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        let removed = before != listeners.len();
        if removed {
            debug!(listener = listener.name(), "[bus] Listener removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Listener names in dispatch order.
    pub fn names(&self) -> Vec<String> {
        self.listeners
            .read()
            .iter()
            .map(|l| l.name().to_string())
            .collect()
    }

    /// Invoke every listener in registration order.
    pub fn dispatch(&self, kind: TicketEventKind, ticket: &Ticket) -> Result<(), DispatchError> {
        let snapshot: Vec<Arc<dyn TicketListener>> = self.listeners.read().clone();

        let failures: Vec<ListenerFailure> = snapshot
            .iter()
            .filter_map(|listener| {
                listener.on_event(kind, ticket).err().map(|error| {
                    warn!(
                        listener = listener.name(),
                        event = %kind,
                        ticket_id = ?ticket.id(),
                        code = %error.code,
                        "[bus] Listener failed: {}",
                        error.message
                    );
                    ListenerFailure {
                        listener: listener.name().to_string(),
                        event: kind,
                        ticket_id: ticket.id().cloned(),
                        error,
                    }
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError { failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::ListenerErrorCode;
    use parking_lot::Mutex;
    use shared_types::{Principal, TicketBuilder};

    struct Recording {
        name: String,
        seen: Arc<Mutex<Vec<String>>>,
        result: Option<ListenerErrorCode>,
    }

    impl TicketListener for Recording {
        fn name(&self) -> &str {
            &self.name
        }

        fn on_event(&self, kind: TicketEventKind, _ticket: &Ticket) -> Result<(), ListenerError> {
            self.seen.lock().push(format!("{}:{}", self.name, kind));
            match self.result {
                Some(code) => Err(ListenerError::new(code, "boom")),
                None => Ok(()),
            }
        }
    }

    fn listener(
        name: &str,
        seen: &Arc<Mutex<Vec<String>>>,
        result: Option<ListenerErrorCode>,
    ) -> Arc<dyn TicketListener> {
        Arc::new(Recording {
            name: name.to_string(),
            seen: seen.clone(),
            result,
        })
    }

    fn ticket() -> Ticket {
        TicketBuilder::new(Principal::new("alice")).requestor("rp").build()
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        registry.add_listener(listener("a", &seen, None));
        registry.add_listener(listener("b", &seen, None));

        registry.dispatch(TicketEventKind::Create, &ticket()).unwrap();
        assert_eq!(*seen.lock(), vec!["a:CREATE", "b:CREATE"]);
    }

    #[test]
    fn test_failure_does_not_stop_dispatch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        registry.add_listener(listener("a", &seen, Some(ListenerErrorCode::Failed)));
        registry.add_listener(listener("b", &seen, None));
        registry.add_listener(listener(
            "c",
            &seen,
            Some(ListenerErrorCode::PartiallyFailed),
        ));

        let err = registry
            .dispatch(TicketEventKind::Remove, &ticket())
            .unwrap_err();

        assert_eq!(seen.lock().len(), 3);
        let names: Vec<_> = err.failures.iter().map(|f| f.listener.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        assert_eq!(err.failures[0].error.code, ListenerErrorCode::Failed);
        assert_eq!(err.failures[1].event, TicketEventKind::Remove);
    }

    #[test]
    fn test_remove_listener_by_identity() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        let a = listener("a", &seen, None);
        registry.add_listener(a.clone());
        registry.add_listener(listener("a", &seen, None));

        assert!(registry.remove_listener(&a));
        assert!(!registry.remove_listener(&a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_combine_keeps_order() {
        let failure = |name: &str| ListenerFailure {
            listener: name.to_string(),
            event: TicketEventKind::Update,
            ticket_id: None,
            error: ListenerError::failed("x"),
        };
        let combined = DispatchError::combine(vec![
            DispatchError {
                failures: vec![failure("1")],
            },
            DispatchError {
                failures: vec![failure("2"), failure("3")],
            },
        ])
        .unwrap();

        let names: Vec<_> = combined.failures.iter().map(|f| f.listener.as_str()).collect();
        assert_eq!(names, ["1", "2", "3"]);
        assert!(DispatchError::combine(Vec::new()).is_none());
    }
}
