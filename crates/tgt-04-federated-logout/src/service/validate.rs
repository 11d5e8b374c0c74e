//! # Request Validation
//!
//! RECEIVED → VALIDATED. Runs before any store access.

use super::*;
use crate::domain::request::TIMEOUT_REASON;

const MAX_ISSUER_LEN: usize = 1024;

impl<KV: KeyValueStore> FederatedLogoutService<KV> {
    pub(super) fn validate(&self, request: &LogoutRequest) -> Result<(), RejectReason> {
        if request.version != self.config.supported_version {
            return Err(RejectReason::UnsupportedVersion {
                version: request.version.clone(),
            });
        }

        self.check_issuer(&request.issuer)?;

        let now = self.lifecycle.now();
        if now.abs_diff(request.issue_instant) > self.config.window_secs {
            return Err(RejectReason::Stale {
                issue_instant: request.issue_instant,
                now,
                window_secs: self.config.window_secs,
            });
        }
        if let Some(not_on_or_after) = request.not_on_or_after {
            if now >= not_on_or_after {
                return Err(RejectReason::RequestExpired { not_on_or_after });
            }
        }

        if let Some(destination) = &request.destination {
            if *destination != self.config.endpoint {
                return Err(RejectReason::DestinationMismatch {
                    expected: self.config.endpoint.clone(),
                    actual: destination.clone(),
                });
            }
        }

        if request.session_references.is_empty() {
            return Err(RejectReason::NoSessionReferences);
        }

        match request.reason() {
            None | Some(TIMEOUT_REASON) => Ok(()),
            Some(other) => Err(RejectReason::UnsupportedReason {
                reason: other.to_string(),
            }),
        }
    }

    /// Present, well-formed, known and enabled.
    fn check_issuer(&self, issuer: &str) -> Result<(), RejectReason> {
        if issuer.trim().is_empty() {
            return Err(RejectReason::MissingIssuer);
        }
        if issuer.len() > MAX_ISSUER_LEN
            || issuer.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(RejectReason::MalformedIssuer {
                issuer: issuer.to_string(),
            });
        }

        let enabled = if self.metadata.is_pool(issuer) {
            self.metadata.get_requestor_pool(issuer).map(|p| p.enabled)
        } else {
            self.metadata.get_requestor(issuer).map(|r| r.enabled)
        };
        match enabled {
            Some(true) => Ok(()),
            Some(false) => Err(RejectReason::DisabledIssuer {
                issuer: issuer.to_string(),
            }),
            None => Err(RejectReason::UnknownIssuer {
                issuer: issuer.to_string(),
            }),
        }
    }
}
