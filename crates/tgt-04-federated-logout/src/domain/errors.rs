//! # Logout Error Types
//!
//! A logout never returns `Err` to the protocol layer. Problems end the state
//! machine in REJECTED (`RejectReason`, requester fault) or FAILED
//! (`FailureReason`, responder fault).

use crate::domain::state::LogoutState;
use shared_bus::DispatchError;
use shared_types::{TicketId, Timestamp};
use thiserror::Error;

/// Which side of the exchange is at fault.
///
/// Only `Requester` faults are worth resending with a corrected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolFault {
    Requester,
    Responder,
}

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("Unsupported protocol version '{version}'")]
    UnsupportedVersion { version: String },

    #[error("Request carries no issuer")]
    MissingIssuer,

    #[error("Issuer '{issuer}' is not well-formed")]
    MalformedIssuer { issuer: String },

    #[error("Issuer '{issuer}' is not a known requestor")]
    UnknownIssuer { issuer: String },

    #[error("Issuer '{issuer}' is disabled")]
    DisabledIssuer { issuer: String },

    #[error("Request issued at {issue_instant} is outside the {window_secs}s window around {now}")]
    Stale {
        issue_instant: Timestamp,
        now: Timestamp,
        window_secs: u64,
    },

    #[error("Request expired at {not_on_or_after}")]
    RequestExpired { not_on_or_after: Timestamp },

    #[error("Destination '{actual}' does not match '{expected}'")]
    DestinationMismatch { expected: String, actual: String },

    #[error("Request carries no session reference")]
    NoSessionReferences,

    #[error("Unsupported logout reason '{reason}'")]
    UnsupportedReason { reason: String },

    #[error("No session reference resolved to a ticket")]
    UnresolvedReference,

    #[error("Alias resolves to missing ticket {ticket_id}")]
    DanglingAlias { ticket_id: TicketId },

    #[error("Issuer '{issuer}' is not attached to the session")]
    IssuerNotAttached { issuer: String },
}

/// Why a valid request could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("Session storage error: {message}")]
    Storage { message: String },

    #[error("Session listeners failed: {0}")]
    Listeners(DispatchError),

    #[error("Illegal logout transition {from} -> {to}")]
    IllegalTransition { from: LogoutState, to: LogoutState },
}

impl FailureReason {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        FailureReason::Storage {
            message: err.to_string(),
        }
    }
}
