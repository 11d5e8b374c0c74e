//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the host application supplies.

use shared_types::Principal;
use thiserror::Error;

/// Principal encoding failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Principal codec error: {message}")]
pub struct CodecError {
    pub message: String,
}

/// Encodes the authenticated principal to the opaque `user` blob.
pub trait PrincipalCodec: Send + Sync {
    fn encode(&self, principal: &Principal) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<Principal, CodecError>;
}

/// Default principal codec using bincode.
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodePrincipalCodec;

impl PrincipalCodec for BincodePrincipalCodec {
    fn encode(&self, principal: &Principal) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(principal).map_err(|e| CodecError {
            message: e.to_string(),
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<Principal, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError {
            message: e.to_string(),
        })
    }
}
