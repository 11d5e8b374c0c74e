//! # Expiry Cleaner
//!
//! Runs `remove_expired` every interval until shutdown is signalled. The
//! sweep itself blocks on storage, so each run goes to the blocking pool.

use shared_types::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;
use tgt_03_ticket_lifecycle::{TicketLifecycleApi, TicketLifecycleManager};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

pub struct ExpiryCleaner<KV: KeyValueStore + 'static> {
    lifecycle: Arc<TicketLifecycleManager<KV>>,
    interval: Duration,
}

impl<KV: KeyValueStore + 'static> ExpiryCleaner<KV> {
    pub fn new(lifecycle: Arc<TicketLifecycleManager<KV>>, interval: Duration) -> Self {
        Self {
            lifecycle,
            interval,
        }
    }

    /// Start the loop. The task resolves to the number of tickets removed.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<usize> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut removed = 0;
            info!(interval_ms = self.interval.as_millis() as u64, "[runtime] Expiry cleaner started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => removed += self.sweep().await,
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            info!(removed, "[runtime] Expiry cleaner stopped");
            removed
        })
    }

    async fn sweep(&self) -> usize {
        let lifecycle = self.lifecycle.clone();
        match tokio::task::spawn_blocking(move || lifecycle.remove_expired()).await {
            Ok(Ok(report)) => {
                if let Some(failures) = &report.listener_failures {
                    warn!("[runtime] Expiry listeners failed: {}", failures);
                }
                debug!(removed = report.removed, "[runtime] Expiry sweep ran");
                report.removed
            }
            Ok(Err(e)) => {
                warn!("[runtime] Expiry sweep failed: {}", e);
                0
            }
            Err(e) => {
                error!("[runtime] Expiry sweep panicked: {}", e);
                0
            }
        }
    }
}
