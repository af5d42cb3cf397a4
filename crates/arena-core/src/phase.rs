use serde::{Deserialize, Serialize};

/// Where the epoch stands relative to `now`. The three values
/// partition all of time past the epoch start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Stakes and withdrawals are open
    Deposit,
    /// Deposit window closed, epoch still running
    Locked,
    /// Epoch over; anyone may trigger the rollover
    RolloverEligible,
}

/// Pure phase model over chain-reported timestamps. Only constructible
/// once all three timing reads have landed, so "not fetched yet" can
/// never masquerade as a permissive phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochSchedule {
    /// Chain timestamp at which the epoch began, seconds
    pub start_time: u64,
    /// Deposit sub-window length, seconds
    pub deposit_phase_duration: u64,
    /// Full epoch length, seconds; invariant: >= deposit window
    pub epoch_duration: u64,
}

impl EpochSchedule {
    pub fn new(start_time: u64, deposit_phase_duration: u64, epoch_duration: u64) -> Self {
        debug_assert!(deposit_phase_duration <= epoch_duration);
        EpochSchedule {
            start_time,
            deposit_phase_duration,
            epoch_duration,
        }
    }

    pub fn phase(&self, now: u64) -> Phase {
        if now < self.start_time + self.deposit_phase_duration {
            Phase::Deposit
        } else if now < self.start_time + self.epoch_duration {
            Phase::Locked
        } else {
            Phase::RolloverEligible
        }
    }

    /// Gates both stake and withdraw
    pub fn is_deposit_phase(&self, now: u64) -> bool {
        self.phase(now) == Phase::Deposit
    }

    pub fn is_rollover_eligible(&self, now: u64) -> bool {
        self.phase(now) == Phase::RolloverEligible
    }

    /// Seconds until the epoch can be rolled over
    pub fn time_remaining(&self, now: u64) -> u64 {
        (self.start_time + self.epoch_duration).saturating_sub(now)
    }
}

/// Render a remaining duration as its largest two non-zero units of
/// days/hours/minutes: "2d 4h", "4h 10m", "5m". Sub-minute remainders
/// render "0m"; zero is the "ended" sentinel.
pub fn format_time_remaining(seconds: u64) -> String {
    if seconds == 0 {
        return "ended".to_string();
    }
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    let units = [(days, "d"), (hours, "h"), (minutes, "m")];
    let mut parts: Vec<String> = units
        .iter()
        .filter(|(value, _)| *value > 0)
        .take(2)
        .map(|(value, suffix)| format!("{}{}", value, suffix))
        .collect();
    if parts.is_empty() {
        parts.push("0m".to_string());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPOSIT: u64 = 172_800; // 2 days
    const EPOCH: u64 = 604_800; // 7 days

    fn schedule(start: u64) -> EpochSchedule {
        EpochSchedule::new(start, DEPOSIT, EPOCH)
    }

    #[test]
    fn test_reference_timeline() {
        let t = 1_700_000_000;
        let s = schedule(t);

        assert_eq!(s.phase(t + 100_000), Phase::Deposit);
        assert_eq!(s.phase(t + 500_000), Phase::Locked);
        assert_eq!(s.phase(t + 700_000), Phase::RolloverEligible);
    }

    #[test]
    fn test_phase_boundaries() {
        let s = schedule(1_000);

        assert!(s.is_deposit_phase(1_000 + DEPOSIT - 1));
        assert!(!s.is_deposit_phase(1_000 + DEPOSIT));

        assert!(!s.is_rollover_eligible(1_000 + EPOCH - 1));
        assert!(s.is_rollover_eligible(1_000 + EPOCH));
        assert_eq!(s.phase(1_000 + EPOCH - 1), Phase::Locked);
    }

    #[test]
    fn test_time_remaining_saturates() {
        let s = schedule(0);
        assert_eq!(s.time_remaining(0), EPOCH);
        assert_eq!(s.time_remaining(EPOCH + 500), 0);
    }

    #[test]
    fn test_format_time_remaining() {
        assert_eq!(format_time_remaining(0), "ended");
        assert_eq!(format_time_remaining(30), "0m");
        assert_eq!(format_time_remaining(5 * 60), "5m");
        assert_eq!(format_time_remaining(4 * 3_600 + 10 * 60), "4h 10m");
        assert_eq!(format_time_remaining(2 * 86_400 + 4 * 3_600 + 59 * 60), "2d 4h");
        // Largest two *non-zero* units: skip a zero middle unit
        assert_eq!(format_time_remaining(86_400 + 5 * 60), "1d 5m");
    }
}
