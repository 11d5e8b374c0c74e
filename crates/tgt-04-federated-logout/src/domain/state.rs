//! # Logout State Machine
//!
//! ```text
//! [RECEIVED] ──→ [VALIDATED] ──→ [RESOLVED] ──→ [FULLY_LOGGED_OUT]
//!     │               │              ├────────→ [PARTIALLY_LOGGED_OUT]
//!     │               │              │
//!     └───────────────┴──────────────┴────────→ [REJECTED] | [FAILED]
//! ```
//!
//! Terminal states accept no further transitions.

use crate::domain::errors::FailureReason;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one logout request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogoutState {
    Received,
    Validated,
    Resolved,
    FullyLoggedOut,
    PartiallyLoggedOut,
    Rejected,
    Failed,
}

impl LogoutState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LogoutState::FullyLoggedOut
                | LogoutState::PartiallyLoggedOut
                | LogoutState::Rejected
                | LogoutState::Failed
        )
    }

    pub fn can_transition_to(self, next: LogoutState) -> bool {
        use LogoutState::*;
        match (self, next) {
            (Received, Validated) => true,
            (Validated, Resolved) => true,
            (Resolved, FullyLoggedOut | PartiallyLoggedOut) => true,
            (Received | Validated | Resolved, Rejected | Failed) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogoutState::Received => "RECEIVED",
            LogoutState::Validated => "VALIDATED",
            LogoutState::Resolved => "RESOLVED",
            LogoutState::FullyLoggedOut => "FULLY_LOGGED_OUT",
            LogoutState::PartiallyLoggedOut => "PARTIALLY_LOGGED_OUT",
            LogoutState::Rejected => "REJECTED",
            LogoutState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for LogoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current state and every state visited.
#[derive(Clone, Debug)]
pub struct LogoutStateMachine {
    state: LogoutState,
    history: Vec<LogoutState>,
}

impl LogoutStateMachine {
    pub fn new() -> Self {
        Self {
            state: LogoutState::Received,
            history: vec![LogoutState::Received],
        }
    }

    pub fn state(&self) -> LogoutState {
        self.state
    }

    /// States visited so far, starting with RECEIVED.
    pub fn history(&self) -> &[LogoutState] {
        &self.history
    }

    pub fn advance(&mut self, next: LogoutState) -> Result<(), FailureReason> {
        if !self.state.can_transition_to(next) {
            return Err(FailureReason::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Force FAILED from any non-terminal state.
    pub(crate) fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = LogoutState::Failed;
            self.history.push(LogoutState::Failed);
        }
    }
}

impl Default for LogoutStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
