//! # Outbound Ports (Driven Ports)

use shared_types::TicketId;

/// Source of candidate ticket ids.
///
/// Candidates may collide; the lifecycle manager checks each one against
/// the store and retries.
pub trait TicketIdGenerator: Send + Sync {
    fn generate(&self) -> TicketId;
}
