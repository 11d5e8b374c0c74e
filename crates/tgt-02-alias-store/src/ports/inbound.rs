//! # Inbound Ports (Driving Ports)
//!
//! Operations a protocol handler performs on one role's alias table. The
//! transactional bulk removals used during ticket removal are inherent
//! methods on `AliasStore`, since they run inside the lifecycle manager's
//! `StoreTransaction`.

use crate::domain::errors::AliasStoreError;
use shared_types::TicketId;

/// Alias correlation API for one role.
pub trait AliasStoreApi {
    /// Associate `alias` with (`ticket_id`, `owner`) under `alias_type`.
    ///
    /// Upsert: updates the alias-type column if the owner already has a row
    /// for this ticket, inserts a new row otherwise.
    ///
    /// ## Errors
    ///
    /// - `Disabled`: store turned off in configuration
    /// - `UnknownAliasType`: no column configured for `alias_type`
    /// - `Insert` / `Update`: the write would not affect exactly one row
    fn put_alias(
        &self,
        alias_type: &str,
        owner: &str,
        ticket_id: &TicketId,
        alias: &str,
    ) -> Result<(), AliasStoreError>;

    /// Alias of `alias_type` held by `owner` for a ticket.
    fn get_alias(
        &self,
        alias_type: &str,
        owner: &str,
        ticket_id: &TicketId,
    ) -> Result<Option<String>, AliasStoreError>;

    /// Reverse lookup: the ticket an external alias refers to.
    fn get_ticket_id(
        &self,
        alias_type: &str,
        owner: &str,
        alias: &str,
    ) -> Result<Option<TicketId>, AliasStoreError>;

    fn is_alias(&self, alias_type: &str, owner: &str, alias: &str)
        -> Result<bool, AliasStoreError>;

    /// Clear one alias column. Other alias types of the same row survive.
    ///
    /// Best-effort: failures are logged, never raised.
    fn remove_alias(&self, alias_type: &str, owner: &str, alias: &str);

    /// Delete the owner's row for a ticket. Returns whether a row existed.
    fn remove_all_for_ticket(
        &self,
        owner: &str,
        ticket_id: &TicketId,
    ) -> Result<bool, AliasStoreError>;
}
