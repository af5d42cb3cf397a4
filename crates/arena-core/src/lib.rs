mod allowance;
mod clock;
mod config;
mod error;
mod orchestrator;
mod phase;
mod poller;
mod store;

pub use allowance::AllowanceGate;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CoreConfig;
pub use error::{GuardViolation, OrchestratorError, Result};
pub use orchestrator::{Intent, StakingOrchestrator};
pub use phase::{format_time_remaining, EpochSchedule, Phase};
pub use poller::Poller;
pub use store::{AggregateStore, Section, Snapshot};

#[cfg(test)]
mod tests;
