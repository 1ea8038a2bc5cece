//! Reward-accrual oracle for block-reward distributors.
//!
//! [`accrual::predict_pending_delta`] computes the reward a pool accrues over a
//! number of blocks, and [`scenario`] compares those predictions against any
//! [`ledger::RewardLedger`]. The remaining modules simulate the contracts the
//! oracle is pointed at.

pub mod types;
pub mod error;
pub mod accrual;
pub mod tolerance;
pub mod token;
pub mod ledger;
pub mod chief;
pub mod wrapper;
pub mod distributor;
pub mod sync;
pub mod pcv;
pub mod scenario;
pub mod config;

// Re-export the commonly used surface
pub use accrual::{predict_harvest, predict_pending, predict_pending_delta, predict_reward_speed, predict_share_delta};
pub use config::{IncentivesFixture, OracleConfig, PoolFixture};
pub use error::{OracleError, Result};
pub use ledger::RewardLedger;
pub use tolerance::Tolerance;
pub use types::{
    Address, Pool, PoolId, Position, RewardState, U256, ACC_REWARD_PRECISION, BASIS_POINTS, ONE_TOKEN,
};
