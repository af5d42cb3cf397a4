use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failure of a ledger read or confirmed write
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The ledger accepted the submission and reverted it, or refused
    /// it up front. Carries the raw rejection payload; classify with
    /// [`RejectReason::classify`].
    #[error("Ledger rejected submission: {message}")]
    Rejected { message: String },

    /// Submission or confirmation never reached the ledger
    #[error("Transport error: {0}")]
    Transport(String),
}

impl LedgerError {
    pub fn rejected(message: impl Into<String>) -> Self {
        LedgerError::Rejected {
            message: message.into(),
        }
    }
}

/// Known rejection reasons, recovered from the raw revert payload.
/// The string fragments match what the staking and token contracts
/// actually emit; anything else is `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Stake/withdraw outside the deposit window
    PhaseClosed,
    /// Stake before joining a faction
    MustJoinFirst,
    /// Zero amount submitted
    AmountZero,
    /// Token allowance below the staked amount
    InsufficientAllowance,
    /// Token balance below the staked amount
    InsufficientBalance,
    Unknown(String),
}

impl RejectReason {
    pub fn classify(message: &str) -> Self {
        if message.contains("DepositPhaseClosed") {
            RejectReason::PhaseClosed
        } else if message.contains("JoinClanFirst") {
            RejectReason::MustJoinFirst
        } else if message.contains("AmountZero") {
            RejectReason::AmountZero
        } else if message.contains("ERC20InsufficientAllowance") || message.contains("0xfb8f41b2") {
            RejectReason::InsufficientAllowance
        } else if message.contains("ERC20InsufficientBalance") {
            RejectReason::InsufficientBalance
        } else {
            RejectReason::Unknown(message.to_string())
        }
    }

    /// Recoverable, user-facing description
    pub fn user_message(&self) -> String {
        match self {
            RejectReason::PhaseClosed => {
                "Deposit phase is closed. Wait for the next epoch.".to_string()
            }
            RejectReason::MustJoinFirst => "You must join a faction first.".to_string(),
            RejectReason::AmountZero => "Amount cannot be zero.".to_string(),
            RejectReason::InsufficientAllowance => {
                "Insufficient token allowance. Approve the staking contract first.".to_string()
            }
            RejectReason::InsufficientBalance => "Insufficient token balance.".to_string(),
            RejectReason::Unknown(message) => format!("Transaction failed: {}", message),
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_payloads() {
        assert_eq!(
            RejectReason::classify("execution reverted: DepositPhaseClosed()"),
            RejectReason::PhaseClosed
        );
        // The staking contract's historical name for a faction is "clan"
        assert_eq!(
            RejectReason::classify("execution reverted: JoinClanFirst()"),
            RejectReason::MustJoinFirst
        );
        assert_eq!(RejectReason::classify("AmountZero()"), RejectReason::AmountZero);
        assert_eq!(
            RejectReason::classify("ERC20InsufficientAllowance(0x.., 0, 100)"),
            RejectReason::InsufficientAllowance
        );
        // Some nodes return only the error selector
        assert_eq!(
            RejectReason::classify("reverted with data 0xfb8f41b2"),
            RejectReason::InsufficientAllowance
        );
        assert_eq!(
            RejectReason::classify("ERC20InsufficientBalance(0x.., 50, 100)"),
            RejectReason::InsufficientBalance
        );
    }

    #[test]
    fn test_classify_unknown_payload() {
        let reason = RejectReason::classify("nonce too low");
        assert_eq!(reason, RejectReason::Unknown("nonce too low".to_string()));
        assert!(reason.user_message().contains("nonce too low"));
    }
}
