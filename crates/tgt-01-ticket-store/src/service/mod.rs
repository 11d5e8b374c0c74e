//! # Ticket Store Service
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `TicketStoreApi` for reads outside any transaction
//! 2. Stages inserts, updates and removals in a caller-owned transaction
//! 3. Implements `TicketPresence` so alias stores can find orphans
//! 4. Validates its table once at startup

mod rows;
mod writes;
#[cfg(test)]
mod tests;

pub use writes::ExpiredTicket;

use crate::domain::config::TicketStoreConfig;
use crate::domain::errors::{RetrievalError, TicketStoreError};
use crate::ports::inbound::TicketStoreApi;
use crate::ports::outbound::{BincodePrincipalCodec, PrincipalCodec};
use shared_types::storage::key;
use shared_types::{
    KVStoreError, KeyValueStore, StoreTransaction, TableProbe, Ticket, TicketId, TicketPresence,
};
use std::sync::Arc;
use tracing::info;

/// The Ticket Store.
pub struct TicketStore<KV, PC = BincodePrincipalCodec>
where
    KV: KeyValueStore,
    PC: PrincipalCodec,
{
    pub(crate) kv: Arc<KV>,
    pub(crate) codec: PC,
    pub(crate) config: TicketStoreConfig,
}

impl<KV: KeyValueStore> TicketStore<KV, BincodePrincipalCodec> {
    /// Ticket store with the default principal codec.
    pub fn with_defaults(kv: Arc<KV>, config: TicketStoreConfig) -> Self {
        Self::new(kv, BincodePrincipalCodec, config)
    }
}

impl<KV, PC> TicketStore<KV, PC>
where
    KV: KeyValueStore,
    PC: PrincipalCodec,
{
    pub fn new(kv: Arc<KV>, codec: PC, config: TicketStoreConfig) -> Self {
        Self { kv, codec, config }
    }

    pub fn config(&self) -> &TicketStoreConfig {
        &self.config
    }

    /// Backing store, for opening transactions.
    pub fn kv(&self) -> &Arc<KV> {
        &self.kv
    }

    /// Run the startup probe (override or generated from the columns).
    ///
    /// A failure here is fatal to startup.
    pub fn validate(&self) -> Result<(), TicketStoreError> {
        let probe = match &self.config.validation_probe {
            Some(probe) => TableProbe::parse(probe)?,
            None => TableProbe::for_schema(&self.config.schema()),
        };
        probe.run(&*self.kv)?;
        info!("[tgt-01] Ticket table '{}' validated", self.config.table);
        Ok(())
    }

    pub(crate) fn row_key(&self, id: &TicketId) -> Vec<u8> {
        key::compose(&[&self.config.table, "row", id.as_str()])
    }

    pub(crate) fn rows_prefix(&self) -> Vec<u8> {
        key::prefix(&[&self.config.table, "row"])
    }

    /// Ticket id encoded in a row key.
    pub(crate) fn id_from_key(&self, row_key: &[u8]) -> Option<TicketId> {
        let prefix = self.rows_prefix();
        let raw = row_key.strip_prefix(prefix.as_slice())?;
        String::from_utf8(raw.to_vec()).ok().map(TicketId::new)
    }

    /// `exists` as seen through a transaction.
    pub fn exists_in(
        &self,
        tx: &StoreTransaction<'_>,
        id: &TicketId,
    ) -> Result<bool, RetrievalError> {
        Ok(tx.exists(&self.row_key(id))?)
    }

    /// `retrieve` as seen through a transaction.
    pub fn retrieve_in(
        &self,
        tx: &StoreTransaction<'_>,
        id: &TicketId,
    ) -> Result<Option<Ticket>, RetrievalError> {
        tx.get(&self.row_key(id))?
            .map(|bytes| self.decode_row(id, &bytes))
            .transpose()
    }
}

impl<KV, PC> TicketStoreApi for TicketStore<KV, PC>
where
    KV: KeyValueStore,
    PC: PrincipalCodec,
{
    fn exists(&self, id: &TicketId) -> Result<bool, RetrievalError> {
        Ok(self.kv.exists(&self.row_key(id))?)
    }

    fn retrieve(&self, id: &TicketId) -> Result<Option<Ticket>, RetrievalError> {
        self.kv
            .get(&self.row_key(id))?
            .map(|bytes| self.decode_row(id, &bytes))
            .transpose()
    }

    fn count(&self) -> Result<usize, RetrievalError> {
        Ok(self.kv.prefix_scan(&self.rows_prefix())?.len())
    }
}

impl<KV, PC> TicketPresence for TicketStore<KV, PC>
where
    KV: KeyValueStore,
    PC: PrincipalCodec,
{
    fn ticket_exists(
        &self,
        tx: &StoreTransaction<'_>,
        id: &TicketId,
    ) -> Result<bool, KVStoreError> {
        tx.exists(&self.row_key(id))
    }
}
