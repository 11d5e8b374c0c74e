//! # Inbound Port

use crate::domain::config::LogoutRole;
use crate::domain::request::LogoutRequest;
use crate::domain::response::LogoutResponse;

/// Logout endpoint as seen by the protocol layer.
pub trait LogoutApi: Send + Sync {
    /// Run one request to a terminal state. Never fails; problems are
    /// reported through the response's outcome.
    fn handle(&self, request: &LogoutRequest) -> LogoutResponse;

    fn role(&self) -> LogoutRole;
}
