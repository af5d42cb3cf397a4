mod account;
mod amount;
mod epoch;
mod error;
mod faction;
mod participant;

pub use account::AccountId;
pub use amount::Amount;
pub use epoch::EpochId;
pub use error::{ArenaError, Result};
pub use faction::{FactionId, FACTION_COUNT};
pub use participant::ParticipantInfo;
