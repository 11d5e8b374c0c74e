//! # Federated Logout (tgt-04)
//!
//! Terminates sessions on behalf of relying parties and identity providers
//! that only know a ticket through an opaque alias.
//!
//! ## State Machine
//!
//! ```text
//! [RECEIVED] ──validate──→ [VALIDATED] ──resolve alias──→ [RESOLVED]
//!     │                        │                              │
//!     └──────── invalid ───────┴──── no match ────→ [REJECTED]│  (Requester fault)
//!                                                             │
//!          timeout + other parties attached ──→ [PARTIALLY_LOGGED_OUT]
//!          explicit / last party / expired  ──→ [FULLY_LOGGED_OUT]
//!          store or listener failure        ──→ [FAILED]      (Responder fault)
//! ```
//!
//! Resolve-then-mutate runs under the ticket's lock. A request that loses a
//! race for the same ticket finds it gone and reports success.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::metadata::StaticRequestorMetadata;
pub use domain::config::{LogoutConfig, LogoutRole};
pub use domain::errors::{FailureReason, ProtocolFault, RejectReason};
pub use domain::request::{LogoutRequest, SessionReference, TIMEOUT_REASON};
pub use domain::response::{LogoutOutcome, LogoutResponse, StatusCode};
pub use domain::state::{LogoutState, LogoutStateMachine};
pub use ports::inbound::LogoutApi;
pub use ports::outbound::{RequestorInfo, RequestorMetadata, RequestorPool};
pub use service::{FederatedLogoutService, LogoutDependencies};
