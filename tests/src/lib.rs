//! # Session Core Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs      # fully wired core on an in-memory store
//!     ├── lifecycle.rs    # batch atomicity, alias isolation, dispatch outcomes
//!     ├── logout.rs       # logout scenarios end to end
//!     └── concurrency.rs  # racing logouts on one ticket
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tgt-tests
//! cargo test -p tgt-tests integration::concurrency
//! ```

pub mod integration;
