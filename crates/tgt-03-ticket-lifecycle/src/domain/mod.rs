//! # Domain Layer
//!
//! - `config` - TTL, ticket cap, id retry ceiling
//! - `errors` - lifecycle error taxonomy
//! - `report` - expiry sweep summary

pub mod config;
pub mod errors;
pub mod report;
