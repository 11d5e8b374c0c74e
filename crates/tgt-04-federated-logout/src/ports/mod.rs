//! # Ports Layer
//!
//! - `inbound.rs` - logout API for the protocol layer
//! - `outbound.rs` - requestor metadata supplied by the host

pub mod inbound;
pub mod outbound;
