//! # Expiry Sweep
//!
//! Table hygiene. Unreadable rows are still deleted; their EXPIRE carries a
//! placeholder with only the id and expiration.

use super::*;
use shared_bus::DispatchError;
use shared_types::TicketPresence;

impl<KV: KeyValueStore> TicketLifecycleManager<KV> {
    pub(super) fn sweep_expired(&self) -> Result<SweepReport, LifecycleError> {
        let now = self.clock.now();
        let mut tx = self.begin();

        let expired = self.tickets.scan_expired(&tx, now)?;
        let mut failures = Vec::new();
        for due in &expired {
            if let Err(e) = &due.ticket {
                warn!(ticket_id = %due.id, "[tgt-03] Expiring unreadable ticket: {}", e);
            }
            if let Err(e) = self
                .listeners
                .dispatch(TicketEventKind::Expire, &due.best_available())
            {
                failures.push(e);
            }
        }

        let removed: Vec<TicketId> = expired.iter().map(|due| due.id.clone()).collect();
        self.tickets.remove_ids(&mut tx, &removed);
        let presence: &dyn TicketPresence = &*self.tickets;
        let orphaned_aliases = [&self.relying_party_aliases, &self.identity_provider_aliases]
            .into_iter()
            .map(|aliases| {
                aliases.sweep_orphaned(&mut tx, presence).unwrap_or_else(|e| {
                    warn!(role = %aliases.role(), "[tgt-03] Orphan sweep failed: {}", e);
                    0
                })
            })
            .sum();

        tx.commit().map_err(PersistenceError::from)?;

        let report = SweepReport {
            removed: removed.len(),
            orphaned_aliases,
            listener_failures: DispatchError::combine(failures),
        };
        if report.removed > 0 || report.orphaned_aliases > 0 {
            info!(
                removed = report.removed,
                orphaned_aliases = report.orphaned_aliases,
                "[tgt-03] Expiry sweep complete"
            );
        }
        Ok(report)
    }
}
