//! # Domain Layer
//!
//! - `config` - role, endpoint, freshness window
//! - `errors` - rejection and failure reasons
//! - `request` / `response` - protocol messages
//! - `state` - logout state machine

pub mod config;
pub mod errors;
pub mod request;
pub mod response;
pub mod state;
