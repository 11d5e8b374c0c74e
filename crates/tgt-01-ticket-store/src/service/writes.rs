//! # Staged Writes
//!
//! Every write checks the affected-row count against the transaction view
//! before staging, so a batch can be abandoned before anything is applied.

use super::*;
use crate::domain::errors::PersistenceError;
use shared_types::Timestamp;
use tracing::{debug, warn};

/// A row found by the expiry scan.
#[derive(Debug)]
pub struct ExpiredTicket {
    pub id: TicketId,
    pub expiration_time: Timestamp,
    /// Full ticket, or why it could not be read.
    pub ticket: Result<Ticket, RetrievalError>,
}

impl ExpiredTicket {
    /// Best available state for the EXPIRE notification.
    pub fn best_available(&self) -> Ticket {
        match &self.ticket {
            Ok(ticket) => ticket.clone(),
            Err(_) => Ticket::placeholder(self.id.clone(), self.expiration_time),
        }
    }
}

impl<KV, PC> TicketStore<KV, PC>
where
    KV: KeyValueStore,
    PC: PrincipalCodec,
{
    /// Stage the row for a freshly identified ticket.
    pub fn insert(
        &self,
        tx: &mut StoreTransaction<'_>,
        ticket: &Ticket,
    ) -> Result<(), PersistenceError> {
        let id = ticket.id().ok_or(PersistenceError::Unidentified)?;
        let key = self.row_key(id);

        if tx.exists(&key)? {
            return Err(PersistenceError::Insert {
                id: id.clone(),
                reason: "a row with this id already exists".to_string(),
            });
        }

        let row = self.encode_row(ticket)?;
        tx.put(key, row);
        debug!(ticket_id = %id, "[tgt-01] Insert staged");
        Ok(())
    }

    /// Stage the new state of an existing row.
    pub fn update(
        &self,
        tx: &mut StoreTransaction<'_>,
        ticket: &Ticket,
    ) -> Result<(), PersistenceError> {
        let id = ticket.id().ok_or(PersistenceError::Unidentified)?;
        let key = self.row_key(id);

        if !tx.exists(&key)? {
            return Err(PersistenceError::Update {
                id: id.clone(),
                reason: "no row with this id".to_string(),
            });
        }

        let row = self.encode_row(ticket)?;
        tx.put(key, row);
        debug!(ticket_id = %id, "[tgt-01] Update staged");
        Ok(())
    }

    /// Stage deletion of an existing row.
    pub fn remove(
        &self,
        tx: &mut StoreTransaction<'_>,
        id: &TicketId,
    ) -> Result<(), PersistenceError> {
        let key = self.row_key(id);

        if !tx.exists(&key)? {
            return Err(PersistenceError::Remove {
                id: id.clone(),
                reason: "no row with this id".to_string(),
            });
        }

        tx.delete(key);
        debug!(ticket_id = %id, "[tgt-01] Remove staged");
        Ok(())
    }

    /// Every row with `expiration_time <= now`, with a best-effort decode of
    /// the full ticket.
    ///
    /// Rows whose expiration cannot be read at all are skipped and logged:
    /// there is no way to tell whether they are due.
    pub fn scan_expired(
        &self,
        tx: &StoreTransaction<'_>,
        now: Timestamp,
    ) -> Result<Vec<ExpiredTicket>, RetrievalError> {
        let rows = tx.prefix_scan(&self.rows_prefix())?;
        let mut expired = Vec::new();

        for (row_key, bytes) in rows {
            let Some(id) = self.id_from_key(&row_key) else {
                warn!("[tgt-01] Skipping ticket row with unreadable key");
                continue;
            };

            let expiration_time = match self.decode_expiration(&id, &bytes) {
                Ok(expiration_time) => expiration_time,
                Err(e) => {
                    warn!(ticket_id = %id, "[tgt-01] Skipping unreadable ticket row: {}", e);
                    continue;
                }
            };

            if expiration_time <= now {
                expired.push(ExpiredTicket {
                    ticket: self.decode_row(&id, &bytes),
                    id,
                    expiration_time,
                });
            }
        }

        Ok(expired)
    }

    /// Stage deletion of the rows for `ids`, typically the result of one
    /// `scan_expired`, so the rows deleted are exactly the rows scanned.
    ///
    /// Callers must fire EXPIRE for these rows before committing; the rows
    /// are gone afterwards.
    pub fn remove_ids(&self, tx: &mut StoreTransaction<'_>, ids: &[TicketId]) {
        for id in ids {
            tx.delete(self.row_key(id));
        }
        debug!(count = ids.len(), "[tgt-01] Expired rows staged for removal");
    }
}
