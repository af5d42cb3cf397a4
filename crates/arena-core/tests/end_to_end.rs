//! Full participant journey against the simulated ledger: faucet,
//! join, approve-then-stake, withdraw, lockup, rollover, and a
//! re-approval-free stake in the next epoch.

use arena_core::{CoreConfig, ManualClock, Phase, StakingOrchestrator};
use arena_ledger::{MemoryLedger, WriteOp};
use arena_types::{AccountId, Amount, FactionId};
use std::sync::Arc;
use std::time::Duration;

const DEPOSIT: u64 = 172_800; // 2 days
const EPOCH: u64 = 604_800; // 7 days

struct World {
    ledger: Arc<MemoryLedger>,
    clock: ManualClock,
    orch: StakingOrchestrator<MemoryLedger>,
}

impl World {
    async fn bootstrap() -> Self {
        let ledger = Arc::new(MemoryLedger::with_timing(0, DEPOSIT, EPOCH));
        let clock = ManualClock::new(0);
        let config = CoreConfig {
            settle_delay: Duration::ZERO,
            faucet_enabled: true,
            ..CoreConfig::default()
        };
        let orch = StakingOrchestrator::with_clock(
            ledger.clone(),
            AccountId::new("0xparticipant"),
            config,
            Arc::new(clock.clone()),
        );
        orch.refresh_all().await.unwrap();
        World { ledger, clock, orch }
    }

    fn warp(&self, now: u64) {
        self.ledger.set_now(now);
        self.clock.set(now);
    }
}

#[tokio::test]
async fn test_epoch_lifecycle() {
    let w = World::bootstrap().await;

    // Deposit phase: fund, join, stake (approval folded in)
    assert_eq!(w.orch.phase(), Some(Phase::Deposit));
    w.orch.mint(Amount::from_units(10_000)).await.unwrap();
    w.orch.join_faction(FactionId::Shadow).await.unwrap();
    w.orch.stake(Amount::from_units(1_000)).await.unwrap();

    let snapshot = w.orch.snapshot();
    assert_eq!(snapshot.wallet_balance, Some(Amount::from_units(9_000)));
    assert_eq!(
        snapshot.faction_tvls.unwrap()[FactionId::Shadow.index()],
        Amount::from_units(1_000)
    );
    assert_eq!(snapshot.stake_percent_of_faction(), 100.0);

    // Partial withdraw while the window is still open
    w.orch.withdraw(Amount::from_units(250)).await.unwrap();
    assert_eq!(
        w.orch.snapshot().participant.unwrap().stake,
        Amount::from_units(750)
    );

    // Reference timeline from the phase model
    w.warp(100_000);
    assert_eq!(w.orch.phase(), Some(Phase::Deposit));
    w.warp(500_000);
    assert_eq!(w.orch.phase(), Some(Phase::Locked));
    assert!(matches!(w.orch.stake(Amount::from_units(1)).await, Err(_)));
    w.warp(700_000);
    assert_eq!(w.orch.phase(), Some(Phase::RolloverEligible));
    assert_eq!(w.orch.time_remaining(), Some(0));

    // Rollover starts epoch 2 and reopens the deposit window
    w.orch.rollover().await.unwrap();
    let snapshot = w.orch.snapshot();
    assert_eq!(snapshot.epoch, Some(2));
    assert_eq!(w.orch.phase(), Some(Phase::Deposit));

    // The unlimited approval from epoch 1 still stands: staking again
    // submits no second approve
    w.orch.stake(Amount::from_units(500)).await.unwrap();
    let approvals = w
        .ledger
        .writes()
        .iter()
        .filter(|op| matches!(op, WriteOp::Approve(_)))
        .count();
    assert_eq!(approvals, 1);
    assert_eq!(
        w.orch.snapshot().participant.unwrap().stake,
        Amount::from_units(1_250)
    );
    assert_eq!(w.orch.pending_intent(), None);
}

#[tokio::test]
async fn test_displayed_values_track_ledger_truth() {
    let w = World::bootstrap().await;
    w.orch.mint(Amount::from_units(2_000)).await.unwrap();
    w.orch.join_faction(FactionId::Wind).await.unwrap();
    w.orch.stake(Amount::from_str_decimal("1234.50").unwrap()).await.unwrap();

    let snapshot = w.orch.snapshot();
    let stake = snapshot.participant.unwrap().stake;
    assert_eq!(stake.raw(), 1_234_500_000);
    assert_eq!(stake.format_grouped(), "1,234.50");

    w.ledger.set_participant_score(
        w.orch.wallet(),
        Amount::from_raw(-500_000),
    );
    w.orch.poll_tick().await.unwrap();
    // Scores ride the participant section, not the poll path
    w.orch.refresh_all().await.unwrap();
    assert_eq!(
        w.orch.snapshot().participant.unwrap().score.format_signed(),
        "-0.50"
    );
}
