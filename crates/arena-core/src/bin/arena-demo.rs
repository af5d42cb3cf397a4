//! Runs the orchestrator against the in-memory ledger: one participant
//! joins a faction, stakes through an approval, withdraws, waits out
//! the lockup, and rolls the epoch over.

use arena_core::{format_time_remaining, CoreConfig, ManualClock, Poller, StakingOrchestrator};
use arena_ledger::MemoryLedger;
use arena_types::{AccountId, Amount, FactionId};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let ledger = Arc::new(MemoryLedger::new());
    let clock = ManualClock::new(0);
    let config = CoreConfig {
        settle_delay: Duration::from_millis(100),
        faucet_enabled: true,
        ..CoreConfig::default()
    };
    let orchestrator = Arc::new(StakingOrchestrator::with_clock(
        ledger.clone(),
        AccountId::new("0xdemo"),
        config,
        Arc::new(clock.clone()),
    ));

    orchestrator.refresh_all().await.expect("initial refresh");
    let _poller = Poller::spawn(orchestrator.clone());

    orchestrator.mint(Amount::from_units(10_000)).await.expect("mint");
    orchestrator.join_faction(FactionId::Wind).await.expect("join");
    orchestrator.stake(Amount::from_units(1_500)).await.expect("stake");
    orchestrator.withdraw(Amount::from_units(500)).await.expect("withdraw");

    let snapshot = orchestrator.snapshot();
    let participant = snapshot.participant.expect("participant fetched");
    println!(
        "epoch #{} | faction {} | staked {} | balance {} | share {:.1}%",
        snapshot.epoch.unwrap_or_default(),
        participant.faction.map(|f| f.as_str()).unwrap_or("none"),
        participant.stake.format_grouped(),
        snapshot.wallet_balance.unwrap_or(Amount::ZERO).format_grouped(),
        snapshot.stake_percent_of_faction(),
    );
    println!(
        "epoch ends in {}",
        format_time_remaining(orchestrator.time_remaining().unwrap_or(0))
    );

    // Jump past the epoch end and roll over
    ledger.set_now(700_000);
    clock.set(700_000);
    orchestrator.poll_tick().await.expect("poll");
    orchestrator.rollover().await.expect("rollover");

    let snapshot = orchestrator.snapshot();
    println!(
        "rolled over to epoch #{}, phase {:?}",
        snapshot.epoch.unwrap_or_default(),
        orchestrator.phase(),
    );
}
