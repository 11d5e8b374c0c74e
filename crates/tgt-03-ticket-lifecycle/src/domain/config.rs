//! # Lifecycle Configuration

/// Default ticket time-to-live (30 minutes).
pub const DEFAULT_TTL_SECS: u64 = 1_800;

/// Default ceiling on id generation attempts per new ticket.
pub const DEFAULT_ID_ATTEMPTS: u32 = 16;

/// Default number of lock stripes.
pub const DEFAULT_LOCK_STRIPES: usize = 64;

/// Ticket Lifecycle Manager configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Seconds a ticket lives after each persist.
    pub ttl_secs: u64,
    /// Optional cap on live tickets.
    pub max_tickets: Option<usize>,
    /// Id generation attempts before giving up.
    pub id_attempts: u32,
    pub lock_stripes: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            max_tickets: None,
            id_attempts: DEFAULT_ID_ATTEMPTS,
            lock_stripes: DEFAULT_LOCK_STRIPES,
        }
    }
}
