//! # Session Termination
//!
//! RESOLVED → FULLY_LOGGED_OUT | PARTIALLY_LOGGED_OUT | FAILED.

use super::*;
use shared_bus::DispatchOutcome;

impl<KV: KeyValueStore> FederatedLogoutService<KV> {
    pub(super) fn log_out(
        &self,
        request: &LogoutRequest,
        reference: &SessionReference,
        ticket: &mut Ticket,
    ) -> Step<LogoutOutcome> {
        let Some(party) = self.attached_party(&request.issuer, ticket) else {
            return Err(LogoutOutcome::Rejected(RejectReason::IssuerNotAttached {
                issuer: request.issuer.clone(),
            }));
        };

        if request.is_timeout() && ticket.has_requestor(&party) && ticket.requestor_ids().len() > 1
        {
            self.detach(request, &party, ticket)
        } else {
            self.terminate(request, reference, ticket)
        }
    }

    /// Drop one party and keep the session for the others.
    fn detach(&self, request: &LogoutRequest, party: &str, ticket: &mut Ticket) -> Step<LogoutOutcome> {
        ticket.detach_requestor(party);
        match self.lifecycle.persist(ticket) {
            Ok(_) => {}
            Err(LifecycleError::Listener(e)) => {
                warn!(party, "[tgt-04] Detach committed, listeners failed: {}", e);
            }
            Err(e) => return Err(LogoutOutcome::Failed(FailureReason::storage(e))),
        }

        if let Some(ticket_id) = ticket.id() {
            if let Err(e) = self.aliases().remove_all_for_ticket(&request.issuer, ticket_id) {
                warn!(
                    ticket_id = %ticket_id,
                    owner = %request.issuer,
                    "[tgt-04] Could not remove alias row of detached party: {}",
                    e
                );
            }
        }
        debug!(party, remaining = ticket.requestor_ids().len(), "[tgt-04] Party detached");
        Ok(LogoutOutcome::PartiallyLoggedOut)
    }

    /// End the whole session.
    fn terminate(
        &self,
        request: &LogoutRequest,
        reference: &SessionReference,
        ticket: &mut Ticket,
    ) -> Step<LogoutOutcome> {
        // Gone before the REMOVE listeners run, so they never call back
        // the party that asked.
        self.aliases()
            .remove_alias(&reference.alias_type, &request.issuer, &reference.value);

        match self.lifecycle.expire_now(ticket) {
            Ok(_) => Ok(LogoutOutcome::FullyLoggedOut),
            Err(LifecycleError::Listener(e)) => match DispatchOutcome::from_failures(&e.failures) {
                DispatchOutcome::Succeeded => Ok(LogoutOutcome::FullyLoggedOut),
                DispatchOutcome::PartiallySucceeded => {
                    warn!("[tgt-04] Session removed, some listeners partially failed: {}", e);
                    Ok(LogoutOutcome::PartiallyLoggedOut)
                }
                DispatchOutcome::Failed => Err(LogoutOutcome::Failed(FailureReason::Listeners(e))),
            },
            Err(e) => Err(LogoutOutcome::Failed(FailureReason::storage(e))),
        }
    }
}
