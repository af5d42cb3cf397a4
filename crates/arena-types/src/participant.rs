use crate::{Amount, EpochId, FactionId};
use serde::{Deserialize, Serialize};

/// Per-participant state as reported by the ledger's participant read.
/// Created implicitly on the first successful faction join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    /// Currently staked amount
    pub stake: Amount,
    /// Faction membership; `None` until the participant joins
    pub faction: Option<FactionId>,
    /// Epoch in which the participant joined their faction
    pub joined_epoch: EpochId,
    /// Ledger-computed score, signed
    pub score: Amount,
}

impl ParticipantInfo {
    /// An account the ledger has never seen
    pub fn unaffiliated() -> Self {
        ParticipantInfo {
            stake: Amount::ZERO,
            faction: None,
            joined_epoch: 0,
            score: Amount::ZERO,
        }
    }
}
