//! # Reference Resolution
//!
//! VALIDATED → RESOLVED, then a second look once the ticket lock is held.
//! A concurrent request may have finished with the same ticket in between.

use super::*;
use tgt_02_alias_store::AliasStoreError;

impl<KV: KeyValueStore> FederatedLogoutService<KV> {
    /// First session reference that maps to a ticket for this issuer.
    pub(super) fn resolve<'r>(
        &self,
        request: &'r LogoutRequest,
    ) -> Step<(&'r SessionReference, TicketId)> {
        let aliases = self.aliases();
        for reference in &request.session_references {
            match aliases.get_ticket_id(&reference.alias_type, &request.issuer, &reference.value) {
                Ok(Some(ticket_id)) => {
                    debug!(
                        ticket_id = %ticket_id,
                        alias_type = %reference.alias_type,
                        issuer = %request.issuer,
                        "[tgt-04] Session reference resolved"
                    );
                    return Ok((reference, ticket_id));
                }
                Ok(None) => {}
                Err(AliasStoreError::UnknownAliasType { alias_type }) => {
                    debug!(alias_type, "[tgt-04] Skipping reference of unknown type");
                }
                Err(e) => return Err(LogoutOutcome::Failed(FailureReason::storage(e))),
            }
        }
        Err(LogoutOutcome::Rejected(RejectReason::UnresolvedReference))
    }

    /// Re-read alias and ticket under the lock.
    ///
    /// `Ok(Ok(ticket))` continues the logout. `Ok(Err(outcome))` means
    /// there is nothing left to do for this issuer.
    pub(super) fn recheck(
        &self,
        request: &LogoutRequest,
        reference: &SessionReference,
        ticket_id: &TicketId,
    ) -> Step<Result<Ticket, LogoutOutcome>> {
        let bound = self
            .aliases()
            .get_ticket_id(&reference.alias_type, &request.issuer, &reference.value)
            .map_err(|e| LogoutOutcome::Failed(FailureReason::storage(e)))?;
        let still_bound = bound.as_ref() == Some(ticket_id);
        let ticket = self
            .lifecycle
            .retrieve(ticket_id)
            .map_err(|e| LogoutOutcome::Failed(FailureReason::storage(e)))?;

        match ticket {
            Some(ticket) if ticket.is_expired(self.lifecycle.now()) => {
                debug!(ticket_id = %ticket_id, "[tgt-04] Ticket already expired");
                Ok(Err(LogoutOutcome::FullyLoggedOut))
            }
            Some(ticket) if still_bound => Ok(Ok(ticket)),
            Some(_) => {
                // A racing timeout logout detached this issuer already.
                debug!(ticket_id = %ticket_id, "[tgt-04] Issuer already detached");
                Ok(Err(LogoutOutcome::PartiallyLoggedOut))
            }
            None if still_bound => Err(LogoutOutcome::Rejected(RejectReason::DanglingAlias {
                ticket_id: ticket_id.clone(),
            })),
            None => {
                debug!(ticket_id = %ticket_id, "[tgt-04] Ticket already removed");
                Ok(Err(LogoutOutcome::FullyLoggedOut))
            }
        }
    }

    /// The attached party the issuer speaks for: itself, or for a pool the
    /// first attached member.
    pub(super) fn attached_party(&self, issuer: &str, ticket: &Ticket) -> Option<String> {
        if ticket.is_attached(issuer) {
            return Some(issuer.to_string());
        }
        if !self.metadata.is_pool(issuer) {
            return None;
        }
        let pool = self.metadata.get_requestor_pool(issuer)?;
        pool.members.into_iter().find(|m| ticket.is_attached(m))
    }
}
