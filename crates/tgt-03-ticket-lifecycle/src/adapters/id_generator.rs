//! # Ticket Id Generators

use crate::ports::outbound::TicketIdGenerator;
use parking_lot::Mutex;
use rand::RngCore;
use shared_types::TicketId;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// Bytes of randomness per ticket id.
const ID_BYTES: usize = 16;

/// 128-bit random ids, hex encoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTicketIdGenerator;

impl TicketIdGenerator for RandomTicketIdGenerator {
    fn generate(&self) -> TicketId {
        let mut bytes = [0u8; ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        TicketId::new(hex::encode(bytes))
    }
}

/// Deterministic ids (`prefix1`, `prefix2`, ...), optionally preceded by a
/// scripted list of candidates. For tests and simulations.
#[derive(Debug)]
pub struct SequenceIdGenerator {
    prefix: String,
    next: AtomicU64,
    scripted: Mutex<VecDeque<String>>,
}

impl SequenceIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    /// Hand out `candidates` first, in order, then fall back to the sequence.
    pub fn with_script<I, S>(prefix: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let generator = Self::new(prefix);
        generator
            .scripted
            .lock()
            .extend(candidates.into_iter().map(Into::into));
        generator
    }
}

impl TicketIdGenerator for SequenceIdGenerator {
    fn generate(&self) -> TicketId {
        if let Some(candidate) = self.scripted.lock().pop_front() {
            return TicketId::new(candidate);
        }
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        TicketId::new(format!("{}{}", self.prefix, n))
    }
}
