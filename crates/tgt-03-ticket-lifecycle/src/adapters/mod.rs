//! # Adapters
//!
//! - `id_generator` - random and deterministic ticket id generators
//! - `locks` - striped per-ticket locks

pub mod id_generator;
pub mod locks;
