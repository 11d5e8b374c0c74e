//! # Logout Response

use crate::domain::errors::{FailureReason, ProtocolFault, RejectReason};
use crate::domain::state::LogoutState;

pub const STATUS_SUCCESS: &str = "urn:oasis:names:tc:SAML:2.0:status:Success";
pub const STATUS_PARTIAL_LOGOUT: &str = "urn:oasis:names:tc:SAML:2.0:status:PartialLogout";
pub const STATUS_REQUESTER: &str = "urn:oasis:names:tc:SAML:2.0:status:Requester";
pub const STATUS_RESPONDER: &str = "urn:oasis:names:tc:SAML:2.0:status:Responder";

/// What happened to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    FullyLoggedOut,
    /// Some parties are still attached, or some listeners could not finish.
    PartiallyLoggedOut,
    Rejected(RejectReason),
    Failed(FailureReason),
}

impl LogoutOutcome {
    /// Terminal state this outcome ends the machine in.
    pub fn terminal_state(&self) -> LogoutState {
        match self {
            LogoutOutcome::FullyLoggedOut => LogoutState::FullyLoggedOut,
            LogoutOutcome::PartiallyLoggedOut => LogoutState::PartiallyLoggedOut,
            LogoutOutcome::Rejected(_) => LogoutState::Rejected,
            LogoutOutcome::Failed(_) => LogoutState::Failed,
        }
    }

    pub fn fault(&self) -> Option<ProtocolFault> {
        match self {
            LogoutOutcome::Rejected(_) => Some(ProtocolFault::Requester),
            LogoutOutcome::Failed(_) => Some(ProtocolFault::Responder),
            _ => None,
        }
    }
}

/// Top-level status plus optional second-level status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode {
    pub value: &'static str,
    pub sub_status: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutResponse {
    pub id: String,
    pub in_response_to: String,
    /// Our own endpoint.
    pub issuer: String,
    pub outcome: LogoutOutcome,
    pub final_state: LogoutState,
}

impl LogoutResponse {
    pub fn status_code(&self) -> StatusCode {
        let (value, sub_status) = match &self.outcome {
            LogoutOutcome::FullyLoggedOut => (STATUS_SUCCESS, None),
            LogoutOutcome::PartiallyLoggedOut => (STATUS_SUCCESS, Some(STATUS_PARTIAL_LOGOUT)),
            LogoutOutcome::Rejected(_) => (STATUS_REQUESTER, None),
            LogoutOutcome::Failed(_) => (STATUS_RESPONDER, None),
        };
        StatusCode { value, sub_status }
    }

    pub fn is_success(&self) -> bool {
        self.status_code().value == STATUS_SUCCESS
    }

    /// Human-readable status message for non-success outcomes.
    pub fn status_message(&self) -> Option<String> {
        match &self.outcome {
            LogoutOutcome::Rejected(reason) => Some(reason.to_string()),
            LogoutOutcome::Failed(reason) => Some(reason.to_string()),
            _ => None,
        }
    }
}
