use arena_ledger::Ledger;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::orchestrator::StakingOrchestrator;

/// Background refresh loop keeping displayed aggregates within one
/// poll interval of ledger truth. Scoped to whatever owns it: dropping
/// the poller aborts the task, so navigating away cannot leak timers.
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawn a poll loop on the given orchestrator at its configured
    /// `poll_interval`. Ticks run independently of in-flight composites
    /// and never touch the intent slot.
    pub fn spawn<L>(orchestrator: Arc<StakingOrchestrator<L>>) -> Self
    where
        L: Ledger + 'static,
    {
        let interval = orchestrator.config().poll_interval;
        Self::spawn_with_interval(orchestrator, interval)
    }

    /// Spawn with an explicit interval, overriding the configured one
    pub fn spawn_with_interval<L>(
        orchestrator: Arc<StakingOrchestrator<L>>,
        interval: Duration,
    ) -> Self
    where
        L: Ledger + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it so spawning
            // right after a full refresh does not double-fetch.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(err) = orchestrator.poll_tick().await {
                    warn!(error = %err, "poll tick failed");
                }
            }
        });
        Poller { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
