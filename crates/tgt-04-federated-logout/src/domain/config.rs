//! # Logout Configuration

use serde::{Deserialize, Serialize};

/// Which alias store resolves incoming session references.
///
/// A relying-party logout service answers requests from downstream
/// applications; an identity-provider one answers the upstream IdP.
pub type LogoutRole = tgt_02_alias_store::AliasRole;

/// Protocol version accepted by default.
pub const SUPPORTED_VERSION: &str = "2.0";

/// Default freshness window, seconds either side of now.
pub const DEFAULT_WINDOW_SECS: u64 = 300;

/// Configuration for one logout endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutConfig {
    pub role: LogoutRole,
    /// Only requests carrying exactly this version are accepted.
    pub supported_version: String,
    /// This endpoint's own URL. Compared against a request's destination
    /// and used as the issuer of responses.
    pub endpoint: String,
    /// Accepted clock skew between `issue_instant` and now.
    pub window_secs: u64,
}

impl LogoutConfig {
    pub fn new(role: LogoutRole, endpoint: impl Into<String>) -> Self {
        Self {
            role,
            supported_version: SUPPORTED_VERSION.to_string(),
            endpoint: endpoint.into(),
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

impl Default for LogoutConfig {
    fn default() -> Self {
        Self::new(LogoutRole::RelyingParty, "https://sso.example.org/logout")
    }
}
