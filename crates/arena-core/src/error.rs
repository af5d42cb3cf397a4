use arena_ledger::{LedgerError, RejectReason};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Everything that can stop a user action. No variant is fatal: the
/// orchestrator returns to idle on every one of them.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A required timing or allowance value has not been fetched yet.
    /// Deny-by-default, not a failure.
    #[error("Chain data not ready: {0}")]
    NotReady(&'static str),

    /// Precondition violated; rejected before any ledger call
    #[error("Guard violation: {0}")]
    Guard(#[from] GuardViolation),

    /// The ledger rejected the submitted write
    #[error("Ledger rejected: {0}")]
    Rejected(RejectReason),

    /// Approval confirmed but the post-settle allowance re-check was
    /// still insufficient; caller must retry explicitly
    #[error("Allowance verification failed after approval settled")]
    AllowanceVerification,

    /// Submission or confirmation failed below the ledger
    #[error("Transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    #[error("another operation is already in flight")]
    OperationInFlight,

    #[error("amount must be positive")]
    AmountNotPositive,

    #[error("withdraw amount exceeds current stake")]
    ExceedsStake,

    #[error("deposit phase is closed")]
    PhaseClosed,

    #[error("epoch is not yet eligible for rollover")]
    NotRolloverEligible,

    #[error("faucet is not available on this network")]
    FaucetDisabled,
}

impl From<LedgerError> for OrchestratorError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected { message } => {
                OrchestratorError::Rejected(RejectReason::classify(&message))
            }
            LedgerError::Transport(message) => OrchestratorError::Transport(message),
        }
    }
}

impl OrchestratorError {
    /// All orchestrator errors are recoverable; this surfaces the
    /// user-facing message for the UI layer.
    pub fn user_message(&self) -> String {
        match self {
            OrchestratorError::Rejected(reason) => reason.user_message(),
            other => other.to_string(),
        }
    }
}
