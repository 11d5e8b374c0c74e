//! # Domain Layer
//!
//! - `config` - role, table and alias-type → column mapping
//! - `errors` - alias store errors

pub mod config;
pub mod errors;
