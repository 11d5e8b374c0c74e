//! # Ticket Lifecycle Service
//!
//! ## Architecture
//!
//! This service:
//! 1. Owns the only path that writes ticket rows
//! 2. Shares one `StoreTransaction` between the ticket store and both alias
//!    stores per operation
//! 3. Dispatches lifecycle events strictly after commit (the expiry sweep
//!    fires EXPIRE before its delete, since the rows are gone afterwards)
//!
//! The ticket store and both alias stores must sit on the same key-value
//! store; transactions are opened on the ticket store's.

mod persist;
mod sweep;

use crate::adapters::locks::{TicketGuard, TicketLocks};
use crate::domain::config::LifecycleConfig;
use crate::domain::errors::LifecycleError;
use crate::domain::report::SweepReport;
use crate::ports::inbound::TicketLifecycleApi;
use crate::ports::outbound::TicketIdGenerator;
use shared_bus::{ListenerRegistry, TicketEventKind};
use shared_types::{
    KeyValueStore, StoreTransaction, Ticket, TicketBuilder, TicketId, TimeSource,
};
use std::sync::Arc;
use tgt_01_ticket_store::{PersistenceError, TicketStore, TicketStoreApi};
use tgt_02_alias_store::{AliasRole, AliasStore};
use tracing::{debug, info, warn};

/// Collaborators of the lifecycle manager.
pub struct LifecycleDependencies<KV: KeyValueStore> {
    pub tickets: Arc<TicketStore<KV>>,
    pub relying_party_aliases: Arc<AliasStore<KV>>,
    pub identity_provider_aliases: Arc<AliasStore<KV>>,
    pub listeners: Arc<ListenerRegistry>,
    pub clock: Arc<dyn TimeSource>,
    pub ids: Arc<dyn TicketIdGenerator>,
}

/// The Ticket Lifecycle Manager.
pub struct TicketLifecycleManager<KV: KeyValueStore> {
    tickets: Arc<TicketStore<KV>>,
    relying_party_aliases: Arc<AliasStore<KV>>,
    identity_provider_aliases: Arc<AliasStore<KV>>,
    listeners: Arc<ListenerRegistry>,
    clock: Arc<dyn TimeSource>,
    ids: Arc<dyn TicketIdGenerator>,
    locks: TicketLocks,
    config: LifecycleConfig,
}

impl<KV: KeyValueStore> TicketLifecycleManager<KV> {
    pub fn new(deps: LifecycleDependencies<KV>, config: LifecycleConfig) -> Self {
        Self {
            tickets: deps.tickets,
            relying_party_aliases: deps.relying_party_aliases,
            identity_provider_aliases: deps.identity_provider_aliases,
            listeners: deps.listeners,
            clock: deps.clock,
            ids: deps.ids,
            locks: TicketLocks::new(config.lock_stripes),
            config,
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn ticket_store(&self) -> &Arc<TicketStore<KV>> {
        &self.tickets
    }

    pub fn listeners(&self) -> &Arc<ListenerRegistry> {
        &self.listeners
    }

    /// Alias store serving `role`.
    pub fn aliases(&self, role: AliasRole) -> &Arc<AliasStore<KV>> {
        match role {
            AliasRole::RelyingParty => &self.relying_party_aliases,
            AliasRole::IdentityProvider => &self.identity_provider_aliases,
        }
    }

    pub fn now(&self) -> shared_types::Timestamp {
        self.clock.now()
    }

    /// Serialize resolve-then-mutate work on one ticket.
    pub fn lock(&self, id: &TicketId) -> TicketGuard<'_> {
        self.locks.lock(id)
    }

    fn begin(&self) -> StoreTransaction<'_> {
        StoreTransaction::begin(&**self.tickets.kv())
    }

    /// Fail if admitting `incoming` more tickets would exceed the cap.
    fn check_quota(&self, incoming: usize) -> Result<(), LifecycleError> {
        let Some(max) = self.config.max_tickets else {
            return Ok(());
        };
        if incoming == 0 {
            return Ok(());
        }
        let current = self.tickets.count()?;
        if current + incoming > max {
            warn!(current, max, incoming, "[tgt-03] Ticket cap reached");
            return Err(LifecycleError::QuotaExceeded { max, current });
        }
        Ok(())
    }

    /// Draw ids until one is free in `tx`'s view of the table.
    fn generate_id(&self, tx: &StoreTransaction<'_>) -> Result<TicketId, LifecycleError> {
        for attempt in 1..=self.config.id_attempts {
            let candidate = self.ids.generate();
            if !self.tickets.exists_in(tx, &candidate)? {
                return Ok(candidate);
            }
            debug!(attempt, "[tgt-03] Ticket id collision, retrying");
        }
        Err(PersistenceError::IdExhausted {
            attempts: self.config.id_attempts,
        }
        .into())
    }

    /// Stage ticket row + alias rows of both roles for deletion.
    fn stage_removal(
        &self,
        tx: &mut StoreTransaction<'_>,
        id: &TicketId,
    ) -> Result<(), LifecycleError> {
        self.tickets.remove(tx, id)?;
        let aliases = self.relying_party_aliases.remove_for_ticket(tx, id)
            + self.identity_provider_aliases.remove_for_ticket(tx, id);
        debug!(ticket_id = %id, aliases, "[tgt-03] Ticket removal staged");
        Ok(())
    }
}

impl<KV: KeyValueStore> TicketLifecycleApi for TicketLifecycleManager<KV> {
    fn create_ticket(&self, builder: TicketBuilder) -> Result<Ticket, LifecycleError> {
        self.check_quota(1)?;
        Ok(builder.build())
    }

    fn persist(&self, ticket: &mut Ticket) -> Result<TicketEventKind, LifecycleError> {
        self.persist_one(ticket)
    }

    fn persist_all(&self, tickets: &mut [Ticket]) -> Result<(), LifecycleError> {
        self.persist_batch(tickets)
    }

    fn remove_expired(&self) -> Result<SweepReport, LifecycleError> {
        self.sweep_expired()
    }

    fn clean(&self, ticket: &Ticket) -> Result<(), LifecycleError> {
        let id = ticket.id().ok_or(PersistenceError::Unidentified)?;

        let mut tx = self.begin();
        self.stage_removal(&mut tx, id)?;
        tx.commit().map_err(PersistenceError::from)?;
        info!(ticket_id = %id, "[tgt-03] Ticket cleaned");

        self.listeners.dispatch(TicketEventKind::Expire, ticket)?;
        Ok(())
    }

    fn expire_now(&self, ticket: &mut Ticket) -> Result<TicketEventKind, LifecycleError> {
        if !ticket.is_persisted() {
            return Err(PersistenceError::Unidentified.into());
        }
        ticket.expire(self.clock.now());
        self.persist_one(ticket)
    }

    fn retrieve(&self, id: &TicketId) -> Result<Option<Ticket>, LifecycleError> {
        Ok(self.tickets.retrieve(id)?)
    }

    fn exists(&self, id: &TicketId) -> Result<bool, LifecycleError> {
        Ok(self.tickets.exists(id)?)
    }

    fn count(&self) -> Result<usize, LifecycleError> {
        Ok(self.tickets.count()?)
    }
}
