//! # Federated Logout Service
//!
//! Drives one `LogoutStateMachine` per request:
//! 1. `validate.rs` - RECEIVED → VALIDATED, or REJECTED
//! 2. `resolve.rs` - VALIDATED → RESOLVED under the ticket lock
//! 3. `terminate.rs` - RESOLVED → full or partial logout, or FAILED
//!
//! Every step returns `Err(outcome)` to end the request early.

mod resolve;
mod terminate;
mod validate;

use crate::domain::config::{LogoutConfig, LogoutRole};
use crate::domain::errors::{FailureReason, RejectReason};
use crate::domain::request::{LogoutRequest, SessionReference};
use crate::domain::response::{LogoutOutcome, LogoutResponse};
use crate::domain::state::{LogoutState, LogoutStateMachine};
use crate::ports::inbound::LogoutApi;
use crate::ports::outbound::RequestorMetadata;
use shared_types::{KeyValueStore, Ticket, TicketId};
use std::sync::Arc;
use tgt_02_alias_store::{AliasStore, AliasStoreApi};
use tgt_03_ticket_lifecycle::{LifecycleError, TicketLifecycleApi, TicketLifecycleManager};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Early exit carrying the terminal outcome.
type Step<T> = Result<T, LogoutOutcome>;

/// Collaborators of a logout service.
pub struct LogoutDependencies<KV: KeyValueStore> {
    pub lifecycle: Arc<TicketLifecycleManager<KV>>,
    pub metadata: Arc<dyn RequestorMetadata>,
}

/// Logout endpoint for one role.
pub struct FederatedLogoutService<KV: KeyValueStore> {
    lifecycle: Arc<TicketLifecycleManager<KV>>,
    metadata: Arc<dyn RequestorMetadata>,
    config: LogoutConfig,
}

impl<KV: KeyValueStore> FederatedLogoutService<KV> {
    pub fn new(deps: LogoutDependencies<KV>, config: LogoutConfig) -> Self {
        Self {
            lifecycle: deps.lifecycle,
            metadata: deps.metadata,
            config,
        }
    }

    pub fn config(&self) -> &LogoutConfig {
        &self.config
    }

    fn aliases(&self) -> &Arc<AliasStore<KV>> {
        self.lifecycle.aliases(self.config.role)
    }

    fn run(&self, request: &LogoutRequest, machine: &mut LogoutStateMachine) -> Step<LogoutOutcome> {
        self.validate(request).map_err(LogoutOutcome::Rejected)?;
        machine
            .advance(LogoutState::Validated)
            .map_err(LogoutOutcome::Failed)?;

        let (reference, ticket_id) = self.resolve(request)?;
        // Held through dispatch; a listener on this thread may re-enter.
        let _guard = self.lifecycle.lock(&ticket_id);
        machine
            .advance(LogoutState::Resolved)
            .map_err(LogoutOutcome::Failed)?;

        let mut ticket = match self.recheck(request, reference, &ticket_id)? {
            Ok(ticket) => ticket,
            Err(settled) => return Ok(settled),
        };
        self.log_out(request, reference, &mut ticket)
    }

    /// Move the machine into `outcome`'s terminal state.
    fn finish(&self, machine: &mut LogoutStateMachine, outcome: LogoutOutcome) -> LogoutOutcome {
        match machine.advance(outcome.terminal_state()) {
            Ok(()) => outcome,
            Err(reason) => {
                error!("[tgt-04] {}", reason);
                machine.fail();
                LogoutOutcome::Failed(reason)
            }
        }
    }
}

impl<KV: KeyValueStore> LogoutApi for FederatedLogoutService<KV> {
    fn handle(&self, request: &LogoutRequest) -> LogoutResponse {
        let mut machine = LogoutStateMachine::new();
        let outcome = match self.run(request, &mut machine) {
            Ok(outcome) | Err(outcome) => outcome,
        };
        let outcome = self.finish(&mut machine, outcome);

        match &outcome {
            LogoutOutcome::Rejected(reason) => warn!(
                request_id = %request.id,
                issuer = %request.issuer,
                role = %self.config.role,
                "[tgt-04] Logout rejected: {}",
                reason
            ),
            LogoutOutcome::Failed(reason) => warn!(
                request_id = %request.id,
                issuer = %request.issuer,
                role = %self.config.role,
                "[tgt-04] Logout failed: {}",
                reason
            ),
            _ => info!(
                request_id = %request.id,
                issuer = %request.issuer,
                role = %self.config.role,
                state = %machine.state(),
                "[tgt-04] Logout complete"
            ),
        }

        LogoutResponse {
            id: format!("_{}", Uuid::new_v4().simple()),
            in_response_to: request.id.clone(),
            issuer: self.config.endpoint.clone(),
            outcome,
            final_state: machine.state(),
        }
    }

    fn role(&self) -> LogoutRole {
        self.config.role
    }
}
