//! # Persist Paths
//!
//! Single and batched persistence. Both classify each ticket the same way,
//! stage into one transaction, restore the caller's tickets if anything
//! fails before the commit lands, and dispatch only afterwards.

use super::*;
use shared_bus::DispatchError;
use shared_types::Timestamp;

impl<KV: KeyValueStore> TicketLifecycleManager<KV> {
    /// Event a persist of `ticket` at `now` will fire. A stored ticket left
    /// with no requestors is dead and goes the way of an expired one.
    fn classify(ticket: &Ticket, now: Timestamp) -> TicketEventKind {
        if !ticket.is_persisted() {
            TicketEventKind::Create
        } else if ticket.is_expired(now) || ticket.requestor_ids().is_empty() {
            TicketEventKind::Remove
        } else {
            TicketEventKind::Update
        }
    }

    /// Stage one ticket's row change for an already classified event.
    fn stage(
        &self,
        tx: &mut StoreTransaction<'_>,
        ticket: &mut Ticket,
        kind: TicketEventKind,
        now: Timestamp,
    ) -> Result<(), LifecycleError> {
        let expiration_time = now.saturating_add(self.config.ttl_secs);
        match kind {
            TicketEventKind::Create => {
                let id = self.generate_id(tx)?;
                ticket.assign_identity(id, now, expiration_time)?;
                self.tickets.insert(tx, ticket)?;
            }
            TicketEventKind::Remove | TicketEventKind::Expire => {
                ticket.expire(now);
                let id = ticket.id().ok_or(PersistenceError::Unidentified)?;
                self.stage_removal(tx, id)?;
            }
            TicketEventKind::Update => {
                ticket.renew(expiration_time);
                self.tickets.update(tx, ticket)?;
            }
        }
        Ok(())
    }

    pub(super) fn persist_one(
        &self,
        ticket: &mut Ticket,
    ) -> Result<TicketEventKind, LifecycleError> {
        let now = self.clock.now();
        let kind = Self::classify(ticket, now);
        if kind == TicketEventKind::Create {
            self.check_quota(1)?;
        }

        let snapshot = ticket.clone();
        let committed = {
            let mut tx = self.begin();
            self.stage(&mut tx, ticket, kind, now).and_then(|()| {
                tx.commit()
                    .map_err(|e| LifecycleError::from(PersistenceError::from(e)))
            })
        };
        if let Err(e) = committed {
            *ticket = snapshot;
            warn!(event = %kind, "[tgt-03] Persist rolled back: {}", e);
            return Err(e);
        }

        debug!(ticket_id = ?ticket.id(), event = %kind, "[tgt-03] Ticket persisted");
        self.listeners.dispatch(kind, ticket)?;
        Ok(kind)
    }

    pub(super) fn persist_batch(&self, tickets: &mut [Ticket]) -> Result<(), LifecycleError> {
        if tickets.is_empty() {
            return Ok(());
        }

        let now = self.clock.now();
        let kinds: Vec<TicketEventKind> = tickets.iter().map(|t| Self::classify(t, now)).collect();
        let creates = kinds
            .iter()
            .filter(|k| **k == TicketEventKind::Create)
            .count();
        self.check_quota(creates)?;

        let snapshots = tickets.to_vec();
        let committed = {
            let mut tx = self.begin();
            self.stage_groups(&mut tx, tickets, &kinds, now)
                .and_then(|()| {
                    tx.commit()
                        .map_err(|e| LifecycleError::from(PersistenceError::from(e)))
                })
        };
        if let Err(e) = committed {
            tickets.clone_from_slice(&snapshots);
            warn!(
                batch = tickets.len(),
                "[tgt-03] Batch persist rolled back: {}", e
            );
            return Err(e);
        }

        info!(
            batch = tickets.len(),
            creates,
            "[tgt-03] Batch persisted"
        );

        let failures = Self::GROUPS.iter().flat_map(|group| {
            tickets
                .iter()
                .zip(&kinds)
                .filter(move |(_, kind)| *kind == group)
                .filter_map(|(ticket, kind)| self.listeners.dispatch(*kind, ticket).err())
                .collect::<Vec<DispatchError>>()
        });
        match DispatchError::combine(failures) {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Statement groups of a batch, in execution and dispatch order.
    const GROUPS: [TicketEventKind; 3] = [
        TicketEventKind::Create,
        TicketEventKind::Remove,
        TicketEventKind::Update,
    ];

    fn stage_groups(
        &self,
        tx: &mut StoreTransaction<'_>,
        tickets: &mut [Ticket],
        kinds: &[TicketEventKind],
        now: Timestamp,
    ) -> Result<(), LifecycleError> {
        for group in Self::GROUPS {
            for (ticket, kind) in tickets.iter_mut().zip(kinds) {
                if *kind == group {
                    self.stage(tx, ticket, group, now)?;
                }
            }
        }
        Ok(())
    }
}
