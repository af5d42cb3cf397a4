use arena_ledger::Ledger;
use arena_types::{AccountId, Amount, FactionId};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::allowance::AllowanceGate;
use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::error::{GuardViolation, OrchestratorError, Result};
use crate::phase::{EpochSchedule, Phase};
use crate::store::{AggregateStore, Section, Snapshot};

/// The in-flight composite operation. At most one exists at a time;
/// the UI reads it for button disablement and labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Joining(FactionId),
    /// Fresh allowance read in progress; the approve-or-stake decision
    /// has not been made yet
    CheckingAllowance(Amount),
    /// Waiting on an approval confirmation; carries the amount to
    /// stake once the allowance verifies
    Approving { stake_amount: Amount },
    Staking(Amount),
    Withdrawing(Amount),
    Minting(Amount),
    RollingOver,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Joining(_) => "joining",
            Intent::CheckingAllowance(_) => "checking-allowance",
            Intent::Approving { .. } => "approving",
            Intent::Staking(_) => "staking",
            Intent::Withdrawing(_) => "withdrawing",
            Intent::Minting(_) => "minting",
            Intent::RollingOver => "rolling-over",
        }
    }
}

/// Sequences the dependent, externally-confirmed ledger operations —
/// join, approve-then-stake, withdraw, mint, rollover — against the
/// epoch phase model, and re-pulls the affected snapshot sections after
/// each confirmation. The single intent slot serializes composites:
/// while one is in flight, every other state-changing call is rejected
/// up front, and every exit path (success, rejection, transport
/// failure) releases the slot.
pub struct StakingOrchestrator<L: Ledger> {
    ledger: Arc<L>,
    wallet: AccountId,
    clock: Arc<dyn Clock>,
    config: CoreConfig,
    store: AggregateStore,
    gate: AllowanceGate,
    intent: Mutex<Option<Intent>>,
}

impl<L: Ledger> StakingOrchestrator<L> {
    pub fn new(ledger: Arc<L>, wallet: AccountId, config: CoreConfig) -> Self {
        Self::with_clock(ledger, wallet, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        ledger: Arc<L>,
        wallet: AccountId,
        config: CoreConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        StakingOrchestrator {
            ledger,
            wallet,
            clock,
            config,
            store: AggregateStore::new(),
            gate: AllowanceGate::new(),
            intent: Mutex::new(None),
        }
    }

    pub fn wallet(&self) -> &AccountId {
        &self.wallet
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Currently in-flight composite, if any
    pub fn pending_intent(&self) -> Option<Intent> {
        *self.intent_slot()
    }

    /// Last-fetched ledger view
    pub fn snapshot(&self) -> Snapshot {
        self.store.load()
    }

    pub fn allowance_gate(&self) -> &AllowanceGate {
        &self.gate
    }

    /// Current phase, `None` until the timing reads have landed
    pub fn phase(&self) -> Option<Phase> {
        Some(self.store.load().schedule()?.phase(self.clock.now()))
    }

    /// Locally computed seconds until rollover eligibility
    pub fn time_remaining(&self) -> Option<u64> {
        Some(self.store.load().schedule()?.time_remaining(self.clock.now()))
    }

    // --- refresh plumbing ---

    /// Pull everything, including the allowance cache
    pub async fn refresh_all(&self) -> Result<()> {
        self.refresh(Section::all()).await?;
        let fresh = self.ledger.allowance(&self.wallet).await?;
        self.gate.note(fresh);
        Ok(())
    }

    /// Poll-driven refresh: timing, aggregates and the allowance. Never
    /// touches the intent slot, so a tick during an in-flight composite
    /// cannot race it.
    pub async fn poll_tick(&self) -> Result<()> {
        self.refresh(&[Section::Timing, Section::Aggregates]).await?;
        let fresh = self.ledger.allowance(&self.wallet).await?;
        self.gate.note(fresh);
        Ok(())
    }

    /// Re-pull the given sections and swap in the updated snapshot
    /// atomically
    async fn refresh(&self, sections: &[Section]) -> Result<()> {
        let mut snapshot = self.store.load();
        for section in sections {
            match section {
                Section::Timing => {
                    snapshot.epoch = Some(self.ledger.current_epoch().await?);
                    snapshot.epoch_start_time = Some(self.ledger.epoch_start_time().await?);
                    snapshot.deposit_phase_duration =
                        Some(self.ledger.deposit_phase_duration().await?);
                    snapshot.epoch_duration = Some(self.ledger.epoch_duration().await?);
                    snapshot.time_until_clear = Some(self.ledger.time_until_clear().await?);
                }
                Section::Aggregates => {
                    snapshot.faction_tvls = Some(self.ledger.faction_tvls().await?);
                    snapshot.faction_scores = Some(self.ledger.faction_scores().await?);
                    snapshot.total_tvl = Some(self.ledger.total_tvl().await?);
                }
                Section::Participant => {
                    snapshot.participant = Some(self.ledger.participant(&self.wallet).await?);
                }
                Section::Balance => {
                    snapshot.wallet_balance =
                        Some(self.ledger.token_balance(&self.wallet).await?);
                }
            }
        }
        snapshot.fetched_at = Some(Utc::now());
        debug!(?sections, "snapshot refreshed");
        self.store.replace(snapshot);
        Ok(())
    }

    // --- composite operations ---

    /// Join a faction. Membership conflicts (already joined) are the
    /// ledger's to reject; they come back as classified rejections.
    pub async fn join_faction(&self, faction: FactionId) -> Result<()> {
        let _guard = self.begin(Intent::Joining(faction))?;
        info!(faction = %faction, "joining faction");
        self.ledger.join_faction(&self.wallet, faction).await?;
        self.refresh(&[Section::Participant]).await?;
        Ok(())
    }

    /// Stake during the deposit window, approving first if the fresh
    /// allowance reading is insufficient. The approval is unlimited so
    /// later epochs need no re-approval. After an approval confirms,
    /// waits out the settle delay and re-verifies exactly once; a still
    /// insufficient reading aborts the composite.
    pub async fn stake(&self, amount: Amount) -> Result<()> {
        if !amount.is_positive() {
            return Err(GuardViolation::AmountNotPositive.into());
        }
        let schedule = self.require_schedule()?;
        if !schedule.is_deposit_phase(self.clock.now()) {
            return Err(GuardViolation::PhaseClosed.into());
        }
        let guard = self.begin(Intent::CheckingAllowance(amount))?;

        // The cached allowance may trail a confirmed approval; only a
        // fresh read can justify skipping the approve step.
        let sufficient = self
            .gate
            .refresh_and_verify(self.ledger.as_ref(), &self.wallet, amount)
            .await?;

        if !sufficient {
            guard.set(Intent::Approving {
                stake_amount: amount,
            });
            info!(amount = %amount, "allowance insufficient, requesting unlimited approval");
            self.ledger.approve(&self.wallet, Amount::MAX).await?;

            tokio::time::sleep(self.config.settle_delay).await;
            let verified = self
                .gate
                .refresh_and_verify(self.ledger.as_ref(), &self.wallet, amount)
                .await?;
            if !verified {
                warn!(amount = %amount, "allowance still insufficient after approval settled");
                return Err(OrchestratorError::AllowanceVerification);
            }
        }

        guard.set(Intent::Staking(amount));
        info!(amount = %amount, "submitting stake");
        self.ledger.stake(&self.wallet, amount).await?;

        self.refresh(&[Section::Participant, Section::Aggregates, Section::Balance])
            .await?;
        let fresh = self.ledger.allowance(&self.wallet).await?;
        self.gate.note(fresh);
        info!(amount = %amount, "stake confirmed");
        Ok(())
    }

    /// Withdraw part of the current stake during the deposit window
    pub async fn withdraw(&self, amount: Amount) -> Result<()> {
        if !amount.is_positive() {
            return Err(GuardViolation::AmountNotPositive.into());
        }
        let participant = self
            .store
            .load()
            .participant
            .ok_or(OrchestratorError::NotReady("participant"))?;
        if amount > participant.stake {
            return Err(GuardViolation::ExceedsStake.into());
        }
        let schedule = self.require_schedule()?;
        if !schedule.is_deposit_phase(self.clock.now()) {
            return Err(GuardViolation::PhaseClosed.into());
        }
        let _guard = self.begin(Intent::Withdrawing(amount))?;

        info!(amount = %amount, "submitting withdraw");
        self.ledger.withdraw(&self.wallet, amount).await?;
        self.refresh(&[Section::Participant, Section::Aggregates, Section::Balance])
            .await?;
        info!(amount = %amount, "withdraw confirmed");
        Ok(())
    }

    /// Test-network faucet credit to the connected wallet
    pub async fn mint(&self, amount: Amount) -> Result<()> {
        if !self.config.faucet_enabled {
            return Err(GuardViolation::FaucetDisabled.into());
        }
        if !amount.is_positive() {
            return Err(GuardViolation::AmountNotPositive.into());
        }
        let _guard = self.begin(Intent::Minting(amount))?;

        info!(amount = %amount, "minting faucet tokens");
        self.ledger.mint(&self.wallet, amount).await?;
        self.refresh(&[Section::Balance]).await?;
        Ok(())
    }

    /// Roll the epoch over once eligible. The ledger redistributes
    /// rewards and restarts the epoch clock.
    pub async fn rollover(&self) -> Result<()> {
        let schedule = self.require_schedule()?;
        if !schedule.is_rollover_eligible(self.clock.now()) {
            return Err(GuardViolation::NotRolloverEligible.into());
        }
        let _guard = self.begin(Intent::RollingOver)?;

        info!("submitting epoch rollover");
        self.ledger.rollover(&self.wallet).await?;
        self.refresh(&[Section::Timing, Section::Aggregates]).await?;
        info!("rollover confirmed");
        Ok(())
    }

    // --- intent slot ---

    /// Check-and-set the intent slot. The returned guard clears it on
    /// drop, so the machine ends idle on every exit path.
    fn begin(&self, intent: Intent) -> Result<IntentGuard<'_>> {
        let mut slot = self.intent_slot();
        if slot.is_some() {
            return Err(GuardViolation::OperationInFlight.into());
        }
        *slot = Some(intent);
        drop(slot);
        Ok(IntentGuard { slot: &self.intent })
    }

    fn require_schedule(&self) -> Result<EpochSchedule> {
        self.store
            .load()
            .schedule()
            .ok_or(OrchestratorError::NotReady("epoch timing"))
    }

    fn intent_slot(&self) -> MutexGuard<'_, Option<Intent>> {
        self.intent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

struct IntentGuard<'a> {
    slot: &'a Mutex<Option<Intent>>,
}

impl IntentGuard<'_> {
    fn set(&self, intent: Intent) {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(intent);
    }
}

impl Drop for IntentGuard<'_> {
    fn drop(&mut self) {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}
