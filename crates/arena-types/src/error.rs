use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid faction: {0}")]
    InvalidFaction(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
