//! # Ticket Table Configuration
//!
//! Resolved table and column names. Every name can be overridden so the
//! store can sit on an existing schema.

use shared_types::TableSchema;

/// Column names of the ticket table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketColumns {
    pub expiration_time: String,
    pub created_at: String,
    pub user: String,
    pub authentication_profile: String,
    pub authentication_profile_ids: String,
    pub requestor_ids: String,
    pub remote_idp: String,
    pub attributes: String,
}

impl Default for TicketColumns {
    fn default() -> Self {
        Self {
            expiration_time: "expiration_time".to_string(),
            created_at: "created_at".to_string(),
            user: "tgt_user".to_string(),
            authentication_profile: "authn_profile".to_string(),
            authentication_profile_ids: "authn_profile_ids".to_string(),
            requestor_ids: "requestor_ids".to_string(),
            remote_idp: "remote_idp".to_string(),
            attributes: "attributes".to_string(),
        }
    }
}

impl TicketColumns {
    /// All column names, in storage order.
    pub fn all(&self) -> Vec<String> {
        vec![
            self.expiration_time.clone(),
            self.created_at.clone(),
            self.user.clone(),
            self.authentication_profile.clone(),
            self.authentication_profile_ids.clone(),
            self.requestor_ids.clone(),
            self.remote_idp.clone(),
            self.attributes.clone(),
        ]
    }
}

/// Ticket Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketStoreConfig {
    /// Table name (key prefix).
    pub table: String,
    pub columns: TicketColumns,
    /// Override for the startup probe (`table:col,col`); default probe is
    /// generated from `columns`.
    pub validation_probe: Option<String>,
}

impl Default for TicketStoreConfig {
    fn default() -> Self {
        Self {
            table: "tgt".to_string(),
            columns: TicketColumns::default(),
            validation_probe: None,
        }
    }
}

impl TicketStoreConfig {
    /// Schema to provision / probe.
    pub fn schema(&self) -> TableSchema {
        TableSchema::new(self.table.clone(), self.columns.all())
    }
}
