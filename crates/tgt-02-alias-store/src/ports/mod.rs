//! # Ports Layer
//!
//! - `inbound.rs` - API used by protocol handlers and the logout service
//!
//! The only driven port is the shared `KeyValueStore`.

pub mod inbound;
