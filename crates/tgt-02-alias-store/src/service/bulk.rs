//! # Bulk Removal
//!
//! Both operations stage into the lifecycle manager's transaction, so the
//! alias rows disappear in the same commit as the ticket rows.

use super::*;
use shared_types::TicketPresence;
use std::collections::HashMap;

impl<KV: KeyValueStore> AliasStore<KV> {
    /// Stage deletion of every row (any owner) for a ticket.
    ///
    /// Best-effort: a read failure is logged and reported as zero rows.
    pub fn remove_for_ticket(
        &self,
        tx: &mut StoreTransaction<'_>,
        ticket_id: &TicketId,
    ) -> usize {
        if !self.config.enabled {
            return 0;
        }
        match self.stage_ticket_rows(tx, ticket_id) {
            Ok(removed) => {
                if removed > 0 {
                    debug!(
                        ticket_id = %ticket_id,
                        removed,
                        role = %self.role,
                        "[tgt-02] Alias rows staged for removal"
                    );
                }
                removed
            }
            Err(e) => {
                warn!(
                    ticket_id = %ticket_id,
                    role = %self.role,
                    "[tgt-02] Could not remove alias rows: {}",
                    e
                );
                0
            }
        }
    }

    fn stage_ticket_rows(
        &self,
        tx: &mut StoreTransaction<'_>,
        ticket_id: &TicketId,
    ) -> Result<usize, AliasStoreError> {
        let rows = tx.prefix_scan(&self.ticket_rows_prefix(ticket_id))?;
        let count = rows.len();
        for (row_key, bytes) in rows {
            self.stage_raw_row_delete(tx, &row_key, &bytes);
        }
        Ok(count)
    }

    /// Stage deletion of every row whose ticket no longer exists.
    ///
    /// Presence is checked through `tx`, so tickets deleted earlier in the
    /// same transaction count as gone.
    pub fn sweep_orphaned(
        &self,
        tx: &mut StoreTransaction<'_>,
        tickets: &dyn TicketPresence,
    ) -> Result<usize, AliasStoreError> {
        if !self.config.enabled {
            return Ok(0);
        }

        let rows = tx.prefix_scan(&self.rows_prefix())?;
        let mut live: HashMap<String, bool> = HashMap::new();
        let mut swept = 0;

        for (row_key, bytes) in rows {
            let Some(ticket) = key::split(&row_key).and_then(|mut parts| {
                (parts.len() == 4).then(|| parts.swap_remove(2))
            }) else {
                warn!(role = %self.role, "[tgt-02] Skipping alias row with unreadable key");
                continue;
            };

            let exists = match live.get(&ticket) {
                Some(exists) => *exists,
                None => {
                    let exists = tickets.ticket_exists(tx, &TicketId::new(ticket.clone()))?;
                    live.insert(ticket, exists);
                    exists
                }
            };
            if !exists {
                self.stage_raw_row_delete(tx, &row_key, &bytes);
                swept += 1;
            }
        }

        if swept > 0 {
            info!(swept, role = %self.role, "[tgt-02] Orphaned alias rows swept");
        }
        Ok(swept)
    }

    /// Delete a row found by a scan. An undecodable row loses its index
    /// entries; the row itself still goes.
    fn stage_raw_row_delete(
        &self,
        tx: &mut StoreTransaction<'_>,
        row_key: &[u8],
        bytes: &[u8],
    ) {
        let owner = key::split(row_key).and_then(|mut parts| parts.pop());
        match (owner, Self::decode_row(bytes)) {
            (Some(owner), Ok(row)) => self.stage_row_delete(tx, &owner, row_key, &row),
            (_, decoded) => {
                if let Err(e) = decoded {
                    warn!(role = %self.role, "[tgt-02] Removing undecodable alias row: {}", e);
                }
                tx.delete(row_key.to_vec());
            }
        }
    }
}
