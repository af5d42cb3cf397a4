use arena_types::{Amount, EpochId, ParticipantInfo, FACTION_COUNT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::phase::EpochSchedule;

/// Which slice of ledger state a refresh should re-pull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Epoch id, start time, durations, time-until-clear
    Timing,
    /// Per-faction TVLs and scores, total TVL
    Aggregates,
    /// Stake, faction, join epoch, score of the connected wallet
    Participant,
    /// Wallet token balance
    Balance,
}

impl Section {
    pub fn all() -> &'static [Section] {
        &[
            Section::Timing,
            Section::Aggregates,
            Section::Participant,
            Section::Balance,
        ]
    }
}

/// Last-fetched view of ledger state. Every field is `None` until its
/// section has been pulled at least once; readers must treat absent
/// data as "pending", never as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub epoch: Option<EpochId>,
    pub epoch_start_time: Option<u64>,
    pub deposit_phase_duration: Option<u64>,
    pub epoch_duration: Option<u64>,
    /// Ledger-reported seconds until rollover eligibility
    pub time_until_clear: Option<u64>,

    pub faction_tvls: Option<[Amount; FACTION_COUNT]>,
    pub faction_scores: Option<[Amount; FACTION_COUNT]>,
    pub total_tvl: Option<Amount>,

    pub participant: Option<ParticipantInfo>,
    pub wallet_balance: Option<Amount>,

    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Phase model inputs, available only once all three timing reads
    /// have landed
    pub fn schedule(&self) -> Option<EpochSchedule> {
        Some(EpochSchedule::new(
            self.epoch_start_time?,
            self.deposit_phase_duration?,
            self.epoch_duration?,
        ))
    }

    /// Participant's share of their faction's TVL, in percent. Zero
    /// when the faction total is zero or nothing is fetched.
    pub fn stake_percent_of_faction(&self) -> f64 {
        let (participant, tvls) = match (&self.participant, &self.faction_tvls) {
            (Some(p), Some(t)) => (p, t),
            _ => return 0.0,
        };
        let faction = match participant.faction {
            Some(f) => f,
            None => return 0.0,
        };
        stake_percent(participant.stake, tvls[faction.index()])
    }
}

/// `100 × own/total`, 0 when the denominator is zero
pub(crate) fn stake_percent(stake: Amount, faction_tvl: Amount) -> f64 {
    if faction_tvl.is_zero() {
        0.0
    } else {
        stake.to_f64() / faction_tvl.to_f64() * 100.0
    }
}

/// Holds the snapshot behind a single atomic-replace operation so a
/// refresh can never expose a torn view: readers clone the whole
/// snapshot, writers swap the whole snapshot.
#[derive(Debug, Default)]
pub struct AggregateStore {
    inner: RwLock<Snapshot>,
}

impl AggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot (cloned; consistent within one refresh cycle)
    pub fn load(&self) -> Snapshot {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Atomically replace the whole snapshot
    pub fn replace(&self, snapshot: Snapshot) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = snapshot;
    }

    /// Drop everything back to unfetched
    pub fn clear(&self) {
        self.replace(Snapshot::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_types::FactionId;

    #[test]
    fn test_stake_percent() {
        assert_eq!(stake_percent(Amount::from_units(250), Amount::from_units(1_000)), 25.0);
        assert_eq!(stake_percent(Amount::from_units(250), Amount::ZERO), 0.0);
        assert_eq!(stake_percent(Amount::ZERO, Amount::from_units(1_000)), 0.0);
    }

    #[test]
    fn test_snapshot_stake_percent_of_faction() {
        let mut snapshot = Snapshot::default();
        assert_eq!(snapshot.stake_percent_of_faction(), 0.0);

        let mut tvls = [Amount::ZERO; FACTION_COUNT];
        tvls[FactionId::Wind.index()] = Amount::from_units(1_000);
        snapshot.faction_tvls = Some(tvls);
        snapshot.participant = Some(ParticipantInfo {
            stake: Amount::from_units(250),
            faction: Some(FactionId::Wind),
            joined_epoch: 1,
            score: Amount::ZERO,
        });

        assert_eq!(snapshot.stake_percent_of_faction(), 25.0);
    }

    #[test]
    fn test_schedule_requires_all_timing_reads() {
        let mut snapshot = Snapshot::default();
        snapshot.epoch_start_time = Some(0);
        snapshot.deposit_phase_duration = Some(100);
        assert!(snapshot.schedule().is_none());

        snapshot.epoch_duration = Some(200);
        let schedule = snapshot.schedule().unwrap();
        assert!(schedule.is_deposit_phase(50));
    }

    #[test]
    fn test_store_replace_is_whole_snapshot() {
        let store = AggregateStore::new();
        assert_eq!(store.load(), Snapshot::default());

        let mut snapshot = Snapshot::default();
        snapshot.epoch = Some(3);
        snapshot.total_tvl = Some(Amount::from_units(42));
        store.replace(snapshot.clone());
        assert_eq!(store.load(), snapshot);

        store.clear();
        assert!(store.load().epoch.is_none());
    }
}
