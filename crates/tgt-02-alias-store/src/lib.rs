//! # Alias Store (tgt-02)
//!
//! Correlates opaque external identifiers (credential tokens, session
//! indexes) to tickets. One instance exists per external role: the
//! relying-party-facing store and the identity-provider-facing store never
//! share rows, even for the same ticket.
//!
//! ## Table Layout
//!
//! ```text
//! <table> \0 row \0 <ticket_id> \0 <owner_id>            →  bincode { column → value }
//! <table> \0 idx \0 <column> \0 <owner_id> \0 <alias>    →  ticket_id
//! ```
//!
//! The row holds the ticket and owner columns plus one column per configured
//! alias type. The `idx` keys answer the reverse lookup used by logout.
//!
//! ## Disabled Stores
//!
//! A disabled store answers every read with "not found", treats removals as
//! no-ops, rejects `put_alias` with `AliasStoreError::Disabled` and skips
//! startup validation.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::config::{AliasRole, AliasStoreConfig};
pub use domain::errors::AliasStoreError;
pub use ports::inbound::AliasStoreApi;
pub use service::AliasStore;
