//! # Logout Request

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;

/// The only reason that asks for a partial logout.
pub const TIMEOUT_REASON: &str = "timeout";

/// An external identifier the issuer knows the session by.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReference {
    /// Alias type, e.g. `session_index`.
    pub alias_type: String,
    pub value: String,
}

impl SessionReference {
    pub fn new(alias_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            alias_type: alias_type.into(),
            value: value.into(),
        }
    }
}

/// A parsed logout request. Wire parsing and signature checks happen upstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub id: String,
    pub version: String,
    pub issue_instant: Timestamp,
    pub issuer: String,
    pub destination: Option<String>,
    /// Tried in order; the first one that resolves wins.
    pub session_references: Vec<SessionReference>,
    pub reason: Option<String>,
    pub not_on_or_after: Option<Timestamp>,
}

impl LogoutRequest {
    /// A version 2.0 request with no references yet.
    pub fn new(id: impl Into<String>, issuer: impl Into<String>, issue_instant: Timestamp) -> Self {
        Self {
            id: id.into(),
            version: crate::domain::config::SUPPORTED_VERSION.to_string(),
            issue_instant,
            issuer: issuer.into(),
            destination: None,
            session_references: Vec::new(),
            reason: None,
            not_on_or_after: None,
        }
    }

    pub fn with_reference(mut self, alias_type: &str, value: &str) -> Self {
        self.session_references
            .push(SessionReference::new(alias_type, value));
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_not_on_or_after(mut self, at: Timestamp) -> Self {
        self.not_on_or_after = Some(at);
        self
    }

    /// The reason, with an empty string treated as absent.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref().filter(|r| !r.is_empty())
    }

    pub fn is_timeout(&self) -> bool {
        self.reason() == Some(TIMEOUT_REASON)
    }
}
