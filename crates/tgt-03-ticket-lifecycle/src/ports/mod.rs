//! # Ports Layer
//!
//! - `inbound.rs` - lifecycle API used by protocol handlers
//! - `outbound.rs` - ticket id generation

pub mod inbound;
pub mod outbound;
