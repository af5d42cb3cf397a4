use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the orchestrator and poller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// How often the poller re-pulls aggregates and the allowance
    pub poll_interval: Duration,

    /// Wait after an approval confirms before the allowance re-check,
    /// tolerating read-after-write lag on RPC nodes
    pub settle_delay: Duration,

    /// Whether the test-network faucet (`mint`) is available
    pub faucet_enabled: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            settle_delay: Duration::from_millis(2_500),
            faucet_enabled: false,
        }
    }
}

impl CoreConfig {
    /// Test-network defaults: faucet on
    pub fn testnet() -> Self {
        Self {
            faucet_enabled: true,
            ..Self::default()
        }
    }
}
