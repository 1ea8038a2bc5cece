//! Error types for the accrual oracle and the simulated contracts it observes.

use crate::types::{Address, PoolId};

/// Result type alias for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// Total allocation points were zero when a prediction was requested.
    #[error("division by zero: total allocation points is zero")]
    DivisionByZero,

    /// Observed and predicted values diverged beyond the accepted band.
    #[error("tolerance exceeded: actual {actual}, expected {expected}, diff {diff}, allowed {allowed}")]
    ToleranceExceeded {
        actual: u128,
        expected: u128,
        diff: u128,
        allowed: u128,
    },

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("unknown pool: {0}")]
    UnknownPool(PoolId),

    #[error("insufficient balance for {account}: have {available}, need {required}")]
    InsufficientBalance {
        account: Address,
        available: u128,
        required: u128,
    },

    #[error("insufficient stake for {owner} in {pool}: have {staked}, need {required}")]
    InsufficientStake {
        owner: Address,
        pool: PoolId,
        staked: u128,
        required: u128,
    },

    #[error("{caller} is not authorized to {action}")]
    Unauthorized { caller: Address, action: &'static str },

    #[error("reward speed update not needed")]
    UpdateNotNeeded,

    #[error("no reward decrease available at timestamp {0}")]
    NoDecreaseAvailable(u64),

    #[error("invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("configuration error: {0}")]
    Config(String),
}
