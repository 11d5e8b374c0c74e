//! # Domain Layer
//!
//! - `config` - table and column naming
//! - `errors` - retrieval / persistence error taxonomy

pub mod config;
pub mod errors;
