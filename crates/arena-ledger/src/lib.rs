mod error;
mod ledger;
mod memory;

pub use error::{LedgerError, RejectReason, Result};
pub use ledger::{Ledger, WriteOp};
pub use memory::MemoryLedger;
