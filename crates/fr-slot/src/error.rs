//! Error types for the slot core

use thiserror::Error;

/// Pre-flight rejection of a spin request.
///
/// Every variant is recoverable: nothing was debited and no history entry
/// was written, so the session stays playable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpinError {
    #[error("Game over: no balance remaining (balance {balance})")]
    InsufficientBalance { balance: i64 },

    #[error("Bet per line must be between {min} and {max}, got {bet}")]
    InvalidBet { bet: u32, min: u32, max: u32 },

    #[error("Line count must be between 1 and {max}, got {lines}")]
    InvalidLineCount { lines: usize, max: usize },

    #[error("Not enough balance for this bet: stake {stake}, balance {balance}")]
    InsufficientFundsForStake { stake: i64, balance: i64 },
}

/// Bonus sub-spin errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BonusError {
    #[error("No bonus spin is pending")]
    NoPendingBonusSpin,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),
}

/// Umbrella error for the slot core
#[derive(Error, Debug)]
pub enum SlotError {
    #[error(transparent)]
    Spin(#[from] SpinError),

    #[error(transparent)]
    Bonus(#[from] BonusError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
