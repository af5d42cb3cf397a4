use arena_ledger::Ledger;
use arena_types::{AccountId, Amount};
use std::sync::Mutex;

use crate::error::Result;

/// Tracks the participant's token allowance toward the staking
/// contract. The cached reading can trail the chain by up to one poll
/// interval, so the decision to *skip* an approval must always go
/// through [`AllowanceGate::refresh_and_verify`], never the cached
/// query.
#[derive(Debug, Default)]
pub struct AllowanceGate {
    cached: Mutex<Option<Amount>>,
}

impl AllowanceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached sufficiency check, for UI labeling only. False when no
    /// reading is cached or the required amount is not positive.
    pub fn has_sufficient(&self, required: Amount) -> bool {
        if !required.is_positive() {
            return false;
        }
        match *self.lock() {
            Some(cached) => cached >= required,
            None => false,
        }
    }

    /// Last cached reading, if any
    pub fn cached(&self) -> Option<Amount> {
        *self.lock()
    }

    /// Record a fresh reading (poll path)
    pub fn note(&self, fresh: Amount) {
        *self.lock() = Some(fresh);
    }

    /// Drop the cached reading
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    /// Force a fresh ledger read, update the cache, and report whether
    /// the fresh value covers `required`. Mandatory immediately before
    /// approving or staking.
    pub async fn refresh_and_verify<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        owner: &AccountId,
        required: Amount,
    ) -> Result<bool> {
        let fresh = ledger.allowance(owner).await?;
        *self.lock() = Some(fresh);
        Ok(required.is_positive() && fresh >= required)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Amount>> {
        self.cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_ledger::MemoryLedger;

    #[test]
    fn test_cached_check_defaults_to_insufficient() {
        let gate = AllowanceGate::new();
        assert!(!gate.has_sufficient(Amount::from_units(1)));

        gate.note(Amount::from_units(100));
        assert!(gate.has_sufficient(Amount::from_units(100)));
        assert!(!gate.has_sufficient(Amount::from_units(101)));
        assert!(!gate.has_sufficient(Amount::ZERO));
        assert!(!gate.has_sufficient(Amount::from_units(-5)));

        gate.invalidate();
        assert!(!gate.has_sufficient(Amount::from_units(1)));
    }

    #[tokio::test]
    async fn test_refresh_and_verify_updates_cache() {
        let ledger = MemoryLedger::new();
        let owner = AccountId::new("0xabc");
        let gate = AllowanceGate::new();

        let ok = gate
            .refresh_and_verify(&ledger, &owner, Amount::from_units(10))
            .await
            .unwrap();
        assert!(!ok);
        assert_eq!(gate.cached(), Some(Amount::ZERO));

        ledger.approve(&owner, Amount::MAX).await.unwrap();
        let ok = gate
            .refresh_and_verify(&ledger, &owner, Amount::from_units(10))
            .await
            .unwrap();
        assert!(ok);
        assert_eq!(gate.cached(), Some(Amount::MAX));
    }
}
