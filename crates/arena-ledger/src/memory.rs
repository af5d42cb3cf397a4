use arena_types::{AccountId, Amount, EpochId, FactionId, ParticipantInfo, FACTION_COUNT};
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{LedgerError, Result};
use crate::ledger::{Ledger, WriteOp};

/// In-memory ledger simulating the staking contract and its token.
/// Suitable for tests and demos: the clock is manual, confirmations are
/// immediate, and rejection payloads match the live contract's revert
/// strings so classification behaves identically.
#[derive(Debug)]
pub struct MemoryLedger {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    now: u64,
    epoch: EpochId,
    epoch_start: u64,
    deposit_phase_duration: u64,
    epoch_duration: u64,
    balances: BTreeMap<AccountId, Amount>,
    allowances: BTreeMap<AccountId, Amount>,
    participants: BTreeMap<AccountId, ParticipantInfo>,
    faction_scores: [Amount; FACTION_COUNT],
    writes: Vec<WriteOp>,
    reject_next: Option<String>,
    transport_fail_next: bool,
    // Models read-after-write lag on the allowance query: while set,
    // approvals land but allowance() keeps reporting the old value.
    hide_allowance_updates: bool,
    visible_allowances: BTreeMap<AccountId, Amount>,
}

impl Inner {
    fn in_deposit_phase(&self) -> bool {
        self.now < self.epoch_start + self.deposit_phase_duration
    }

    fn rollover_eligible(&self) -> bool {
        self.now >= self.epoch_start + self.epoch_duration
    }

    /// Consume an injected failure, if armed
    fn take_injected_failure(&mut self) -> Result<()> {
        if self.transport_fail_next {
            self.transport_fail_next = false;
            return Err(LedgerError::Transport("connection reset".to_string()));
        }
        if let Some(message) = self.reject_next.take() {
            return Err(LedgerError::Rejected { message });
        }
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    fn allowance_of(&self, owner: &AccountId) -> Amount {
        self.allowances.get(owner).copied().unwrap_or(Amount::ZERO)
    }
}

impl MemoryLedger {
    /// Fresh ledger: epoch 1 starting at t=0 with the reference timing
    /// (2-day deposit window inside a 7-day epoch)
    pub fn new() -> Self {
        Self::with_timing(0, 172_800, 604_800)
    }

    pub fn with_timing(epoch_start: u64, deposit_phase_duration: u64, epoch_duration: u64) -> Self {
        assert!(deposit_phase_duration <= epoch_duration);
        MemoryLedger {
            inner: Mutex::new(Inner {
                now: epoch_start,
                epoch: 1,
                epoch_start,
                deposit_phase_duration,
                epoch_duration,
                balances: BTreeMap::new(),
                allowances: BTreeMap::new(),
                participants: BTreeMap::new(),
                faction_scores: [Amount::ZERO; FACTION_COUNT],
                writes: Vec::new(),
                reject_next: None,
                transport_fail_next: false,
                hide_allowance_updates: false,
                visible_allowances: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // --- simulated chain clock ---

    pub fn set_now(&self, now: u64) {
        self.lock().now = now;
    }

    pub fn advance(&self, seconds: u64) {
        self.lock().now += seconds;
    }

    pub fn now(&self) -> u64 {
        self.lock().now
    }

    // --- test hooks ---

    /// Ordered log of confirmed writes
    pub fn writes(&self) -> Vec<WriteOp> {
        self.lock().writes.clone()
    }

    /// Reject the next write with the given revert payload
    pub fn reject_next(&self, message: impl Into<String>) {
        self.lock().reject_next = Some(message.into());
    }

    /// Fail the next write at the transport layer
    pub fn fail_next_transport(&self) {
        self.lock().transport_fail_next = true;
    }

    /// While enabled, approvals confirm but the allowance read keeps
    /// returning its pre-approval value
    pub fn set_hide_allowance_updates(&self, hide: bool) {
        let mut inner = self.lock();
        if !hide {
            inner.visible_allowances = inner.allowances.clone();
        }
        inner.hide_allowance_updates = hide;
    }

    pub fn set_faction_score(&self, faction: FactionId, score: Amount) {
        self.lock().faction_scores[faction.index()] = score;
    }

    pub fn set_participant_score(&self, address: &AccountId, score: Amount) {
        let mut inner = self.lock();
        if let Some(p) = inner.participants.get_mut(address) {
            p.score = score;
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Ledger for MemoryLedger {
    async fn current_epoch(&self) -> Result<EpochId> {
        Ok(self.lock().epoch)
    }

    async fn epoch_start_time(&self) -> Result<u64> {
        Ok(self.lock().epoch_start)
    }

    async fn deposit_phase_duration(&self) -> Result<u64> {
        Ok(self.lock().deposit_phase_duration)
    }

    async fn epoch_duration(&self) -> Result<u64> {
        Ok(self.lock().epoch_duration)
    }

    async fn time_until_clear(&self) -> Result<u64> {
        let inner = self.lock();
        Ok((inner.epoch_start + inner.epoch_duration).saturating_sub(inner.now))
    }

    async fn faction_tvls(&self) -> Result<[Amount; FACTION_COUNT]> {
        let inner = self.lock();
        let mut tvls = [Amount::ZERO; FACTION_COUNT];
        for participant in inner.participants.values() {
            if let Some(faction) = participant.faction {
                tvls[faction.index()] = tvls[faction.index()] + participant.stake;
            }
        }
        Ok(tvls)
    }

    async fn faction_scores(&self) -> Result<[Amount; FACTION_COUNT]> {
        Ok(self.lock().faction_scores)
    }

    async fn total_tvl(&self) -> Result<Amount> {
        let inner = self.lock();
        let mut total = Amount::ZERO;
        for participant in inner.participants.values() {
            total = total + participant.stake;
        }
        Ok(total)
    }

    async fn participant(&self, address: &AccountId) -> Result<ParticipantInfo> {
        Ok(self
            .lock()
            .participants
            .get(address)
            .copied()
            .unwrap_or_else(ParticipantInfo::unaffiliated))
    }

    async fn token_balance(&self, address: &AccountId) -> Result<Amount> {
        Ok(self.lock().balance_of(address))
    }

    async fn allowance(&self, owner: &AccountId) -> Result<Amount> {
        let inner = self.lock();
        if inner.hide_allowance_updates {
            Ok(inner.visible_allowances.get(owner).copied().unwrap_or(Amount::ZERO))
        } else {
            Ok(inner.allowance_of(owner))
        }
    }

    async fn approve(&self, caller: &AccountId, amount: Amount) -> Result<()> {
        let mut inner = self.lock();
        inner.take_injected_failure()?;
        inner.allowances.insert(caller.clone(), amount);
        if !inner.hide_allowance_updates {
            inner.visible_allowances.insert(caller.clone(), amount);
        }
        inner.writes.push(WriteOp::Approve(amount));
        Ok(())
    }

    async fn join_faction(&self, caller: &AccountId, faction: FactionId) -> Result<()> {
        let mut inner = self.lock();
        inner.take_injected_failure()?;
        if inner
            .participants
            .get(caller)
            .map(|p| p.faction.is_some())
            .unwrap_or(false)
        {
            return Err(LedgerError::rejected("AlreadyInFaction()"));
        }
        let epoch = inner.epoch;
        let entry = inner
            .participants
            .entry(caller.clone())
            .or_insert_with(ParticipantInfo::unaffiliated);
        entry.faction = Some(faction);
        entry.joined_epoch = epoch;
        inner.writes.push(WriteOp::JoinFaction(faction));
        Ok(())
    }

    async fn stake(&self, caller: &AccountId, amount: Amount) -> Result<()> {
        let mut inner = self.lock();
        inner.take_injected_failure()?;
        if !inner.in_deposit_phase() {
            return Err(LedgerError::rejected("DepositPhaseClosed()"));
        }
        if inner
            .participants
            .get(caller)
            .and_then(|p| p.faction)
            .is_none()
        {
            return Err(LedgerError::rejected("JoinClanFirst()"));
        }
        if !amount.is_positive() {
            return Err(LedgerError::rejected("AmountZero()"));
        }
        let allowance = inner.allowance_of(caller);
        if allowance < amount {
            return Err(LedgerError::rejected(format!(
                "ERC20InsufficientAllowance({}, {}, {})",
                caller,
                allowance.raw(),
                amount.raw()
            )));
        }
        let balance = inner.balance_of(caller);
        if balance < amount {
            return Err(LedgerError::rejected(format!(
                "ERC20InsufficientBalance({}, {}, {})",
                caller,
                balance.raw(),
                amount.raw()
            )));
        }

        inner.balances.insert(caller.clone(), balance - amount);
        // Unlimited approvals never decrement
        if allowance != Amount::MAX {
            inner.allowances.insert(caller.clone(), allowance - amount);
            if !inner.hide_allowance_updates {
                inner
                    .visible_allowances
                    .insert(caller.clone(), allowance - amount);
            }
        }
        if let Some(p) = inner.participants.get_mut(caller) {
            p.stake = p.stake + amount;
        }
        inner.writes.push(WriteOp::Stake(amount));
        Ok(())
    }

    async fn withdraw(&self, caller: &AccountId, amount: Amount) -> Result<()> {
        let mut inner = self.lock();
        inner.take_injected_failure()?;
        if !inner.in_deposit_phase() {
            return Err(LedgerError::rejected("DepositPhaseClosed()"));
        }
        if !amount.is_positive() {
            return Err(LedgerError::rejected("AmountZero()"));
        }
        let stake = inner
            .participants
            .get(caller)
            .map(|p| p.stake)
            .unwrap_or(Amount::ZERO);
        if stake < amount {
            return Err(LedgerError::rejected("WithdrawExceedsStake()"));
        }
        let balance = inner.balance_of(caller);
        inner.balances.insert(caller.clone(), balance + amount);
        if let Some(p) = inner.participants.get_mut(caller) {
            p.stake = p.stake - amount;
        }
        inner.writes.push(WriteOp::Withdraw(amount));
        Ok(())
    }

    async fn rollover(&self, _caller: &AccountId) -> Result<()> {
        let mut inner = self.lock();
        inner.take_injected_failure()?;
        if !inner.rollover_eligible() {
            return Err(LedgerError::rejected("EpochNotOver()"));
        }
        inner.epoch += 1;
        inner.epoch_start = inner.now;
        inner.faction_scores = [Amount::ZERO; FACTION_COUNT];
        for participant in inner.participants.values_mut() {
            participant.score = Amount::ZERO;
        }
        inner.writes.push(WriteOp::Rollover);
        Ok(())
    }

    async fn mint(&self, to: &AccountId, amount: Amount) -> Result<()> {
        let mut inner = self.lock();
        inner.take_injected_failure()?;
        if !amount.is_positive() {
            return Err(LedgerError::rejected("AmountZero()"));
        }
        let balance = inner.balance_of(to);
        inner.balances.insert(to.clone(), balance + amount);
        inner.writes.push(WriteOp::Mint(amount));
        Ok(())
    }
}
