//! # Background Handlers
//!
//! - `expiry_cleaner` - periodic expiry sweep

pub mod expiry_cleaner;

pub use expiry_cleaner::ExpiryCleaner;
