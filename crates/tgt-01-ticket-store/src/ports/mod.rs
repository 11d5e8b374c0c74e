//! # Ports Layer
//!
//! - `inbound.rs` - Driving ports (read API exposed to other subsystems)
//! - `outbound.rs` - Driven ports (principal codec supplied by the host)

pub mod inbound;
pub mod outbound;
