//! # Table Catalog
//!
//! Each table publishes its column list under a catalog key. Stores validate
//! their resolved table/column names once at startup by running a probe
//! against the catalog; a failed probe is fatal.
//!
//! Probe override syntax: `table:column,column,...`

use super::key;
use super::kv::KeyValueStore;
use crate::errors::SchemaError;
use std::collections::BTreeSet;
use tracing::{debug, info};

const CATALOG: &str = "__catalog";

/// Table name plus the columns a store expects to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<String>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>, columns: impl IntoIterator<Item = String>) -> Self {
        Self {
            table: table.into(),
            columns: columns.into_iter().collect(),
        }
    }

    fn catalog_key(table: &str) -> Vec<u8> {
        key::compose(&[CATALOG, table])
    }

    /// Register the table and its columns in the catalog.
    ///
    /// Existing columns are kept, so two stores sharing a table can each
    /// provision their own columns.
    pub fn provision(&self, store: &dyn KeyValueStore) -> Result<(), SchemaError> {
        let mut columns = read_columns(store, &self.table)?.unwrap_or_default();
        columns.extend(self.columns.iter().cloned());

        let encoded = bincode::serialize(&columns).map_err(|e| SchemaError::InvalidProbe {
            probe: self.table.clone(),
            reason: e.to_string(),
        })?;
        store.put(&Self::catalog_key(&self.table), &encoded)?;

        info!(
            "[storage] Provisioned table '{}' ({} columns)",
            self.table,
            columns.len()
        );
        Ok(())
    }

    /// Provision only on first bootstrap. A table already in the catalog is
    /// left as stored so the startup probe checks the configuration against
    /// it. Returns whether the table was provisioned.
    pub fn provision_if_absent(&self, store: &dyn KeyValueStore) -> Result<bool, SchemaError> {
        if read_columns(store, &self.table)?.is_some() {
            debug!(table = %self.table, "[storage] Table already catalogued");
            return Ok(false);
        }
        self.provision(store)?;
        Ok(true)
    }
}

/// Lightweight existence check for a table and a set of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProbe {
    pub table: String,
    pub columns: Vec<String>,
}

impl TableProbe {
    /// Default probe generated from the resolved column names.
    pub fn for_schema(schema: &TableSchema) -> Self {
        Self {
            table: schema.table.clone(),
            columns: schema.columns.clone(),
        }
    }

    /// Parse a configured override probe (`table:col,col`).
    pub fn parse(probe: &str) -> Result<Self, SchemaError> {
        let invalid = |reason: &str| SchemaError::InvalidProbe {
            probe: probe.to_string(),
            reason: reason.to_string(),
        };

        let (table, columns) = match probe.split_once(':') {
            Some((table, columns)) => (table.trim(), columns),
            None => (probe.trim(), ""),
        };
        if table.is_empty() {
            return Err(invalid("missing table name"));
        }

        let columns: Vec<String> = columns
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            table: table.to_string(),
            columns,
        })
    }

    /// Run the probe against the catalog.
    pub fn run(&self, store: &dyn KeyValueStore) -> Result<(), SchemaError> {
        let known = read_columns(store, &self.table)?.ok_or_else(|| SchemaError::MissingTable {
            table: self.table.clone(),
        })?;

        if let Some(missing) = self.columns.iter().find(|c| !known.contains(*c)) {
            return Err(SchemaError::MissingColumn {
                table: self.table.clone(),
                column: missing.clone(),
            });
        }

        debug!(table = %self.table, columns = self.columns.len(), "Table probe passed");
        Ok(())
    }
}

fn read_columns(
    store: &dyn KeyValueStore,
    table: &str,
) -> Result<Option<BTreeSet<String>>, SchemaError> {
    let Some(bytes) = store.get(&TableSchema::catalog_key(table))? else {
        return Ok(None);
    };
    bincode::deserialize(&bytes)
        .map(Some)
        .map_err(|e| SchemaError::InvalidProbe {
            probe: table.to_string(),
            reason: format!("unreadable catalog entry: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryKVStore;

    fn schema() -> TableSchema {
        TableSchema::new(
            "tgt_alias",
            ["tgt_id".to_string(), "owner_id".to_string(), "session_index".to_string()],
        )
    }

    #[test]
    fn test_default_probe_passes_after_provision() {
        let store = InMemoryKVStore::new();
        schema().provision(&store).unwrap();
        TableProbe::for_schema(&schema()).run(&store).unwrap();
    }

    #[test]
    fn test_probe_on_missing_table() {
        let store = InMemoryKVStore::new();
        let err = TableProbe::for_schema(&schema()).run(&store).unwrap_err();
        assert!(matches!(err, SchemaError::MissingTable { .. }));
    }

    #[test]
    fn test_probe_on_missing_column() {
        let store = InMemoryKVStore::new();
        schema().provision(&store).unwrap();

        let probe = TableProbe::parse("tgt_alias: tgt_id, credentials").unwrap();
        let err = probe.run(&store).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumn {
                table: "tgt_alias".into(),
                column: "credentials".into()
            }
        );
    }

    #[test]
    fn test_provision_merges_columns() {
        let store = InMemoryKVStore::new();
        schema().provision(&store).unwrap();
        TableSchema::new("tgt_alias", ["credentials".to_string()])
            .provision(&store)
            .unwrap();

        TableProbe::parse("tgt_alias:session_index,credentials")
            .unwrap()
            .run(&store)
            .unwrap();
    }

    #[test]
    fn test_provision_if_absent_keeps_stored_columns() {
        let store = InMemoryKVStore::new();
        assert!(schema().provision_if_absent(&store).unwrap());

        let renamed = TableSchema::new(
            "tgt_alias",
            ["tgt_id".to_string(), "owner_id".to_string(), "sidx".to_string()],
        );
        assert!(!renamed.provision_if_absent(&store).unwrap());

        let err = TableProbe::for_schema(&renamed).run(&store).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumn {
                table: "tgt_alias".into(),
                column: "sidx".into()
            }
        );
    }

    #[test]
    fn test_parse_rejects_empty_table() {
        assert!(matches!(
            TableProbe::parse(":a,b"),
            Err(SchemaError::InvalidProbe { .. })
        ));
    }
}
