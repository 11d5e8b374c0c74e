//! # Alias Store Service
//!
//! Single-row operations open and commit their own transaction. Bulk
//! removals (`remove_for_ticket`, `sweep_orphaned`) stage into the caller's
//! transaction; see `bulk.rs`.

mod bulk;

use crate::domain::config::{AliasRole, AliasStoreConfig};
use crate::domain::errors::AliasStoreError;
use crate::ports::inbound::AliasStoreApi;
use shared_types::storage::key;
use shared_types::{KeyValueStore, StoreTransaction, TableProbe, TicketId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Column name → value.
type Row = BTreeMap<String, String>;

/// One role's alias table.
pub struct AliasStore<KV: KeyValueStore> {
    kv: Arc<KV>,
    role: AliasRole,
    config: AliasStoreConfig,
}

impl<KV: KeyValueStore> AliasStore<KV> {
    pub fn new(kv: Arc<KV>, role: AliasRole, config: AliasStoreConfig) -> Self {
        Self { kv, role, config }
    }

    pub fn role(&self) -> AliasRole {
        self.role
    }

    pub fn config(&self) -> &AliasStoreConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Configured alias types, in name order.
    pub fn alias_types(&self) -> impl Iterator<Item = &str> {
        self.config.alias_columns.keys().map(String::as_str)
    }

    /// Run the startup probe. Skipped entirely when the store is disabled.
    pub fn validate(&self) -> Result<(), AliasStoreError> {
        if !self.config.enabled {
            info!("[tgt-02] {} alias store disabled, skipping validation", self.role);
            return Ok(());
        }

        let probe = match &self.config.validation_probe {
            Some(probe) => TableProbe::parse(probe)?,
            None => TableProbe::for_schema(&self.config.schema()),
        };
        probe.run(&*self.kv)?;
        info!(
            "[tgt-02] {} alias table '{}' validated",
            self.role, self.config.table
        );
        Ok(())
    }

    fn column(&self, alias_type: &str) -> Result<&str, AliasStoreError> {
        self.config
            .column_for(alias_type)
            .ok_or_else(|| AliasStoreError::UnknownAliasType {
                alias_type: alias_type.to_string(),
            })
    }

    fn row_key(&self, ticket_id: &TicketId, owner: &str) -> Vec<u8> {
        key::compose(&[&self.config.table, "row", ticket_id.as_str(), owner])
    }

    fn rows_prefix(&self) -> Vec<u8> {
        key::prefix(&[&self.config.table, "row"])
    }

    fn ticket_rows_prefix(&self, ticket_id: &TicketId) -> Vec<u8> {
        key::prefix(&[&self.config.table, "row", ticket_id.as_str()])
    }

    fn index_key(&self, column: &str, owner: &str, alias: &str) -> Vec<u8> {
        key::compose(&[&self.config.table, "idx", column, owner, alias])
    }

    fn decode_row(bytes: &[u8]) -> Result<Row, AliasStoreError> {
        bincode::deserialize(bytes).map_err(|e| AliasStoreError::Malformed {
            reason: e.to_string(),
        })
    }

    fn encode_row(row: &Row) -> Result<Vec<u8>, AliasStoreError> {
        bincode::serialize(row).map_err(|e| AliasStoreError::Malformed {
            reason: e.to_string(),
        })
    }

    fn load_row(
        tx: &StoreTransaction<'_>,
        row_key: &[u8],
    ) -> Result<Option<Row>, AliasStoreError> {
        tx.get(row_key)?
            .map(|bytes| Self::decode_row(&bytes))
            .transpose()
    }

    /// Stage deletion of a row and every index entry pointing at it.
    fn stage_row_delete(
        &self,
        tx: &mut StoreTransaction<'_>,
        owner: &str,
        row_key: &[u8],
        row: &Row,
    ) {
        for column in self.config.alias_columns.values() {
            if let Some(alias) = row.get(column) {
                tx.delete(self.index_key(column, owner, alias));
            }
        }
        tx.delete(row_key.to_vec());
    }

    fn try_remove_alias(
        &self,
        alias_type: &str,
        owner: &str,
        alias: &str,
    ) -> Result<bool, AliasStoreError> {
        if !self.config.enabled {
            return Ok(false);
        }
        let column = self.column(alias_type)?;
        let mut tx = StoreTransaction::begin(&*self.kv);

        let index_key = self.index_key(column, owner, alias);
        let Some(raw_id) = tx.get(&index_key)? else {
            return Ok(false);
        };
        let ticket_id = Self::ticket_id_from(raw_id)?;

        let row_key = self.row_key(&ticket_id, owner);
        if let Some(mut row) = Self::load_row(&tx, &row_key)? {
            if row.get(column).map(String::as_str) == Some(alias) {
                row.remove(column);
                tx.put(row_key, Self::encode_row(&row)?);
            }
        }
        tx.delete(index_key);
        tx.commit()?;
        Ok(true)
    }

    fn ticket_id_from(raw: Vec<u8>) -> Result<TicketId, AliasStoreError> {
        String::from_utf8(raw)
            .map(TicketId::new)
            .map_err(|_| AliasStoreError::Malformed {
                reason: "alias index holds a non UTF-8 ticket id".to_string(),
            })
    }
}

impl<KV: KeyValueStore> AliasStoreApi for AliasStore<KV> {
    fn put_alias(
        &self,
        alias_type: &str,
        owner: &str,
        ticket_id: &TicketId,
        alias: &str,
    ) -> Result<(), AliasStoreError> {
        if !self.config.enabled {
            return Err(AliasStoreError::Disabled { role: self.role });
        }
        let column = self.column(alias_type)?;
        let mut tx = StoreTransaction::begin(&*self.kv);

        let row_key = self.row_key(ticket_id, owner);
        let existing = Self::load_row(&tx, &row_key)?;
        let updating = existing.is_some();
        let write_error = |reason: String| {
            if updating {
                AliasStoreError::Update {
                    ticket_id: ticket_id.clone(),
                    owner: owner.to_string(),
                    reason,
                }
            } else {
                AliasStoreError::Insert {
                    ticket_id: ticket_id.clone(),
                    owner: owner.to_string(),
                    reason,
                }
            }
        };

        // An alias resolves to exactly one ticket per owner and type.
        let index_key = self.index_key(column, owner, alias);
        if let Some(bound) = tx.get(&index_key)? {
            if bound != ticket_id.as_str().as_bytes() {
                return Err(write_error(format!(
                    "{alias_type} alias is already bound to another ticket"
                )));
            }
        }

        let row = match existing {
            Some(mut row) => {
                if let Some(previous) = row.insert(column.to_string(), alias.to_string()) {
                    if previous != alias {
                        tx.delete(self.index_key(column, owner, &previous));
                    }
                }
                row
            }
            None => Row::from([
                (self.config.ticket_column.clone(), ticket_id.to_string()),
                (self.config.owner_column.clone(), owner.to_string()),
                (column.to_string(), alias.to_string()),
            ]),
        };

        tx.put(row_key, Self::encode_row(&row)?);
        tx.put(index_key, ticket_id.as_str().as_bytes().to_vec());
        tx.commit().map_err(|e| write_error(e.to_string()))?;

        debug!(
            ticket_id = %ticket_id,
            owner,
            alias_type,
            role = %self.role,
            "[tgt-02] Alias {}",
            if updating { "updated" } else { "inserted" }
        );
        Ok(())
    }

    fn get_alias(
        &self,
        alias_type: &str,
        owner: &str,
        ticket_id: &TicketId,
    ) -> Result<Option<String>, AliasStoreError> {
        if !self.config.enabled {
            return Ok(None);
        }
        let column = self.column(alias_type)?;
        let Some(bytes) = self.kv.get(&self.row_key(ticket_id, owner))? else {
            return Ok(None);
        };
        Ok(Self::decode_row(&bytes)?.remove(column))
    }

    fn get_ticket_id(
        &self,
        alias_type: &str,
        owner: &str,
        alias: &str,
    ) -> Result<Option<TicketId>, AliasStoreError> {
        if !self.config.enabled {
            return Ok(None);
        }
        let column = self.column(alias_type)?;
        self.kv
            .get(&self.index_key(column, owner, alias))?
            .map(Self::ticket_id_from)
            .transpose()
    }

    fn is_alias(
        &self,
        alias_type: &str,
        owner: &str,
        alias: &str,
    ) -> Result<bool, AliasStoreError> {
        Ok(self.get_ticket_id(alias_type, owner, alias)?.is_some())
    }

    fn remove_alias(&self, alias_type: &str, owner: &str, alias: &str) {
        match self.try_remove_alias(alias_type, owner, alias) {
            Ok(true) => debug!(owner, alias_type, role = %self.role, "[tgt-02] Alias removed"),
            Ok(false) => {}
            Err(e) => warn!(
                owner,
                alias_type,
                role = %self.role,
                "[tgt-02] Could not remove alias: {}",
                e
            ),
        }
    }

    fn remove_all_for_ticket(
        &self,
        owner: &str,
        ticket_id: &TicketId,
    ) -> Result<bool, AliasStoreError> {
        if !self.config.enabled {
            return Ok(false);
        }
        let mut tx = StoreTransaction::begin(&*self.kv);
        let row_key = self.row_key(ticket_id, owner);
        let Some(row) = Self::load_row(&tx, &row_key)? else {
            return Ok(false);
        };

        self.stage_row_delete(&mut tx, owner, &row_key, &row);
        tx.commit()?;
        debug!(ticket_id = %ticket_id, owner, role = %self.role, "[tgt-02] Owner row removed");
        Ok(true)
    }
}
