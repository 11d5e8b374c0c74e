//! # Adapters
//!
//! - `metadata` - in-memory requestor metadata

pub mod metadata;
