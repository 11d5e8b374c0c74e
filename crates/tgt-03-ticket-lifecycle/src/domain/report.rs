//! # Sweep Report

use shared_bus::DispatchError;

/// Result of one expiry sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Ticket rows deleted.
    pub removed: usize,
    /// Alias rows deleted because their ticket was gone (both roles).
    pub orphaned_aliases: usize,
    /// EXPIRE listener failures. The rows are deleted regardless.
    pub listener_failures: Option<DispatchError>,
}
