use arena_types::{AccountId, Amount, EpochId, FactionId, ParticipantInfo, FACTION_COUNT};

use crate::error::Result;

/// Client-side surface of the external staking ledger. Reads return
/// last-confirmed chain state; writes resolve only once the submitted
/// transaction is confirmed (or rejected). Implementations for a live
/// chain wrap an RPC client; [`crate::MemoryLedger`] simulates the
/// contract rules for tests and demos.
///
/// The token spender is always the staking contract, so allowance
/// queries take only the owner.
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    // --- epoch timing reads ---

    async fn current_epoch(&self) -> Result<EpochId>;

    /// Chain timestamp (seconds) at which the current epoch began
    async fn epoch_start_time(&self) -> Result<u64>;

    /// Length of the deposit sub-window, seconds
    async fn deposit_phase_duration(&self) -> Result<u64>;

    /// Full epoch length, seconds; at least the deposit duration
    async fn epoch_duration(&self) -> Result<u64>;

    /// Seconds until the epoch can be rolled over (0 once eligible)
    async fn time_until_clear(&self) -> Result<u64>;

    // --- aggregate reads ---

    async fn faction_tvls(&self) -> Result<[Amount; FACTION_COUNT]>;

    async fn faction_scores(&self) -> Result<[Amount; FACTION_COUNT]>;

    async fn total_tvl(&self) -> Result<Amount>;

    async fn participant(&self, address: &AccountId) -> Result<ParticipantInfo>;

    // --- token reads ---

    async fn token_balance(&self, address: &AccountId) -> Result<Amount>;

    /// Amount the owner has authorized the staking contract to move
    async fn allowance(&self, owner: &AccountId) -> Result<Amount>;

    // --- confirmed writes ---

    /// Authorize the staking contract to spend `amount` of the caller's
    /// tokens. The orchestrator always passes [`Amount::MAX`].
    async fn approve(&self, caller: &AccountId, amount: Amount) -> Result<()>;

    async fn join_faction(&self, caller: &AccountId, faction: FactionId) -> Result<()>;

    async fn stake(&self, caller: &AccountId, amount: Amount) -> Result<()>;

    async fn withdraw(&self, caller: &AccountId, amount: Amount) -> Result<()>;

    /// Rollover the epoch: redistribute rewards and restart the clock.
    /// The ledger enforces eligibility.
    async fn rollover(&self, caller: &AccountId) -> Result<()>;

    /// Test-network faucet credit
    async fn mint(&self, to: &AccountId, amount: Amount) -> Result<()>;
}

/// A confirmed write as recorded by test ledgers, in submission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Approve(Amount),
    JoinFaction(FactionId),
    Stake(Amount),
    Withdraw(Amount),
    Rollover,
    Mint(Amount),
}
