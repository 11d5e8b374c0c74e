//! # Ticket Store (tgt-01)
//!
//! Durable table of tickets keyed by ticket id. Owns read, count and the
//! row-level writes; it never commits on its own. Every write is staged in a
//! caller-owned `StoreTransaction` so ticket rows and alias rows commit or
//! roll back together.
//!
//! ## Table Layout
//!
//! ```text
//! <table> \0 row \0 <ticket_id>  →  bincode { column name → blob }
//! ```
//!
//! | Column (default name) | Content |
//! |-----------------------|---------|
//! | `expiration_time` | u64 LE seconds |
//! | `created_at` | u64 LE seconds |
//! | `tgt_user` | principal codec blob |
//! | `authn_profile` | bincode `Option<AuthenticationProfile>` |
//! | `authn_profile_ids` | bincode `Vec<String>` |
//! | `requestor_ids` | bincode `Vec<String>` |
//! | `remote_idp` | bincode `Option<String>` |
//! | `attributes` | JSON attribute bag |
//!
//! ## Error Contract
//!
//! - Read path: `RetrievalError::Unavailable` (connectivity) is distinct from
//!   `RetrievalError::Malformed` (stored data cannot be decoded). Neither is
//!   ever reported as "not found".
//! - Write path: `PersistenceError::{Insert, Update, Remove}` whenever a
//!   write would not affect exactly one row.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::config::{TicketColumns, TicketStoreConfig};
pub use domain::errors::{PersistenceError, RetrievalError, TicketStoreError};
pub use ports::inbound::TicketStoreApi;
pub use ports::outbound::{BincodePrincipalCodec, CodecError, PrincipalCodec};
pub use service::{ExpiredTicket, TicketStore};
