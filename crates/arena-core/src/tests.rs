// Cross-module tests: phase partition property and spec'd reference
// values

#[cfg(test)]
mod tests {
    use crate::{format_time_remaining, EpochSchedule, Phase};
    use proptest::prelude::*;

    proptest! {
        /// Deposit / locked / rollover-eligible partition every `now`:
        /// exactly one holds, with the documented boundaries.
        #[test]
        fn prop_phases_partition_time(
            start in 0u64..=u32::MAX as u64,
            deposit in 1u64..=1_000_000,
            extra in 0u64..=1_000_000,
            offset in 0u64..=3_000_000,
        ) {
            let epoch = deposit + extra; // deposit <= epoch always
            let schedule = EpochSchedule::new(start, deposit, epoch);
            let now = start + offset;

            let in_deposit = now < start + deposit;
            let eligible = now >= start + epoch;

            prop_assert_eq!(schedule.is_deposit_phase(now), in_deposit);
            prop_assert_eq!(schedule.is_rollover_eligible(now), eligible);

            let phase = schedule.phase(now);
            match phase {
                Phase::Deposit => prop_assert!(in_deposit && !eligible),
                Phase::Locked => prop_assert!(!in_deposit && !eligible),
                Phase::RolloverEligible => prop_assert!(!in_deposit && eligible),
            }
        }

        #[test]
        fn prop_time_remaining_consistent_with_eligibility(
            start in 0u64..=u32::MAX as u64,
            deposit in 1u64..=1_000_000,
            extra in 0u64..=1_000_000,
            offset in 0u64..=3_000_000,
        ) {
            let schedule = EpochSchedule::new(start, deposit, deposit + extra);
            let now = start + offset;
            let remaining = schedule.time_remaining(now);
            prop_assert_eq!(remaining == 0, schedule.is_rollover_eligible(now));
            prop_assert_eq!(format_time_remaining(remaining) == "ended", remaining == 0);
        }
    }
}
