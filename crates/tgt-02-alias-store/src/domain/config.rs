//! # Alias Store Configuration

use serde::{Deserialize, Serialize};
use shared_types::TableSchema;
use std::collections::BTreeMap;
use std::fmt;

/// External role an alias store serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AliasRole {
    /// Downstream relying parties that were issued assertions.
    RelyingParty,
    /// Upstream identity providers the session was federated from.
    IdentityProvider,
}

impl AliasRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AliasRole::RelyingParty => "relying-party",
            AliasRole::IdentityProvider => "identity-provider",
        }
    }
}

impl fmt::Display for AliasRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alias Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasStoreConfig {
    /// Feature flag; a disabled store never touches its table.
    pub enabled: bool,
    pub table: String,
    pub ticket_column: String,
    pub owner_column: String,
    /// Alias type → column holding aliases of that type.
    pub alias_columns: BTreeMap<String, String>,
    /// Override for the startup probe (`table:col,col`).
    pub validation_probe: Option<String>,
}

impl AliasStoreConfig {
    /// Defaults for the relying-party-facing store.
    pub fn relying_party() -> Self {
        Self::with_table(
            "tgt_rp_alias",
            [("credential", "credential"), ("session_index", "session_index")],
        )
    }

    /// Defaults for the identity-provider-facing store.
    pub fn identity_provider() -> Self {
        Self::with_table(
            "tgt_idp_alias",
            [("session_index", "session_index"), ("name_id", "name_id")],
        )
    }

    /// Defaults for `role`.
    pub fn for_role(role: AliasRole) -> Self {
        match role {
            AliasRole::RelyingParty => Self::relying_party(),
            AliasRole::IdentityProvider => Self::identity_provider(),
        }
    }

    fn with_table<const N: usize>(table: &str, columns: [(&str, &str); N]) -> Self {
        Self {
            enabled: true,
            table: table.to_string(),
            ticket_column: "tgt_id".to_string(),
            owner_column: "owner_id".to_string(),
            alias_columns: columns
                .into_iter()
                .map(|(alias_type, column)| (alias_type.to_string(), column.to_string()))
                .collect(),
            validation_probe: None,
        }
    }

    /// Column configured for an alias type.
    pub fn column_for(&self, alias_type: &str) -> Option<&str> {
        self.alias_columns.get(alias_type).map(String::as_str)
    }

    /// Schema to provision / probe.
    pub fn schema(&self) -> TableSchema {
        let mut columns = vec![self.ticket_column.clone(), self.owner_column.clone()];
        columns.extend(self.alias_columns.values().cloned());
        TableSchema::new(self.table.clone(), columns)
    }
}

impl Default for AliasStoreConfig {
    fn default() -> Self {
        Self::relying_party()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_use_separate_tables() {
        let rp = AliasStoreConfig::for_role(AliasRole::RelyingParty);
        let idp = AliasStoreConfig::for_role(AliasRole::IdentityProvider);
        assert_ne!(rp.table, idp.table);
        assert_eq!(rp.column_for("credential"), Some("credential"));
        assert_eq!(idp.column_for("credential"), None);
    }

    #[test]
    fn test_schema_lists_every_column() {
        let schema = AliasStoreConfig::relying_party().schema();
        assert_eq!(schema.table, "tgt_rp_alias");
        assert_eq!(
            schema.columns,
            ["tgt_id", "owner_id", "credential", "session_index"]
        );
    }
}
