//! # Reward Accrual
//!
//! Pure functions predicting how much reward a staking position accrues. The
//! simulated distributor uses the same functions for its own pool updates, so
//! predictions and simulated state truncate identically.
//!
//! Every product is formed in `U256` before the single floor division, which
//! matches the distributor's fixed-point truncation exactly.

use crate::error::{OracleError, Result};
use crate::types::{HARVEST_BLOCK_SLACK, U256};

/// Predicts the pending reward a pool accrues over `blocks_elapsed` blocks.
///
/// # Arguments
/// * `blocks_elapsed` - Number of blocks since the observed baseline.
/// * `reward_per_block` - Global emission per block, fixed-point scaled.
/// * `pool_alloc_points` - Allocation weight of the pool.
/// * `total_alloc_points` - Sum of allocation weights of all pools.
///
/// # Returns
/// `floor(blocks_elapsed * reward_per_block * pool_alloc_points / total_alloc_points)`.
pub fn predict_pending_delta(
    blocks_elapsed: u64,
    reward_per_block: u128,
    pool_alloc_points: u128,
    total_alloc_points: u128,
) -> Result<u128> {
    if total_alloc_points == 0 {
        return Err(OracleError::DivisionByZero);
    }

    let numerator = U256::from(blocks_elapsed)
        .checked_mul(U256::from(reward_per_block))
        .and_then(|v| v.checked_mul(U256::from(pool_alloc_points)))
        .ok_or(OracleError::Overflow("pending delta numerator"))?;

    let delta = numerator / U256::from(total_alloc_points);
    delta
        .try_into()
        .map_err(|_| OracleError::Overflow("pending delta"))
}

/// Adds a predicted delta to a previously observed pending baseline.
pub fn predict_pending(baseline: u128, delta: u128) -> Result<u128> {
    baseline
        .checked_add(delta)
        .ok_or(OracleError::Overflow("pending reward"))
}

/// Per-block emission of a single pool. This is the speed an auto rewards
/// distributor mirrors into a downstream market.
pub fn predict_reward_speed(
    reward_per_block: u128,
    pool_alloc_points: u128,
    total_alloc_points: u128,
) -> Result<u128> {
    predict_pending_delta(1, reward_per_block, pool_alloc_points, total_alloc_points)
}

/// Reward paid by a harvest sent after `blocks_mined` blocks since the previous
/// harvest. The harvest transaction mines one more block before paying out.
pub fn predict_harvest(
    blocks_mined: u64,
    reward_per_block: u128,
    pool_alloc_points: u128,
    total_alloc_points: u128,
) -> Result<u128> {
    let blocks = blocks_mined
        .checked_add(HARVEST_BLOCK_SLACK)
        .ok_or(OracleError::Overflow("harvest block count"))?;
    predict_pending_delta(blocks, reward_per_block, pool_alloc_points, total_alloc_points)
}

/// A single staker's share of a pool-wide delta.
///
/// # Arguments
/// * `pool_delta` - Reward accrued by the whole pool.
/// * `staked` - The staker's amount.
/// * `pool_total_staked` - Total amount staked in the pool.
pub fn predict_share_delta(pool_delta: u128, staked: u128, pool_total_staked: u128) -> Result<u128> {
    if pool_total_staked == 0 {
        return Err(OracleError::DivisionByZero);
    }

    let share = U256::from(pool_delta) * U256::from(staked) / U256::from(pool_total_staked);
    share
        .try_into()
        .map_err(|_| OracleError::Overflow("share delta"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ONE_TOKEN;

    const TRIBE_PER_BLOCK: u128 = 26_150_000_000_000_000_000;

    #[test]
    fn test_predict_pending_delta_reference_scenario() {
        let delta = predict_pending_delta(10, TRIBE_PER_BLOCK, 1000, 2000).unwrap();
        assert_eq!(delta, 130_750_000_000_000_000_000);
    }

    #[test]
    fn test_zero_total_alloc_is_rejected() {
        let result = predict_pending_delta(10, TRIBE_PER_BLOCK, 1000, 0);
        assert_eq!(result, Err(OracleError::DivisionByZero));
    }

    #[test]
    fn test_zero_blocks_predicts_nothing() {
        assert_eq!(predict_pending_delta(0, TRIBE_PER_BLOCK, 1000, 3350).unwrap(), 0);
    }

    #[test]
    fn test_multiplication_precedes_division() {
        // 7 * 1 * 1 / 3 = 2, whereas 7 * (1 * 1 / 3) would be 0.
        assert_eq!(predict_pending_delta(7, 1, 1, 3).unwrap(), 2);
        // Per-block floor summed over 3 blocks loses more than the single floor.
        let per_block = predict_pending_delta(1, 10, 1, 3).unwrap();
        assert_eq!(per_block * 3, 9);
        assert_eq!(predict_pending_delta(3, 10, 1, 3).unwrap(), 10);
    }

    #[test]
    fn test_large_products_do_not_overflow_u128() {
        // 1e9 blocks * 1e30 * 1e6 overflows u128 but not the U256 intermediate.
        let delta = predict_pending_delta(1_000_000_000, ONE_TOKEN * 1_000_000_000_000, 1_000_000, 1_000_000_000).unwrap();
        assert_eq!(delta, ONE_TOKEN * ONE_TOKEN);
    }

    #[test]
    fn test_result_overflow_is_reported() {
        let result = predict_pending_delta(u64::MAX, u128::MAX, 2, 1);
        assert_eq!(result, Err(OracleError::Overflow("pending delta")));

        let result = predict_pending_delta(u64::MAX, u128::MAX, u128::MAX, 1);
        assert_eq!(result, Err(OracleError::Overflow("pending delta numerator")));
    }

    #[test]
    fn test_reward_speed_and_harvest() {
        let eleven = 11 * ONE_TOKEN;
        assert_eq!(predict_reward_speed(eleven, 1000, 3350).unwrap(), eleven * 1000 / 3350);

        let harvest = predict_harvest(10, TRIBE_PER_BLOCK, 1000, 3350).unwrap();
        assert_eq!(harvest, 11 * TRIBE_PER_BLOCK * 1000 / 3350);
    }

    #[test]
    fn test_share_delta() {
        assert_eq!(predict_share_delta(900, 1, 3).unwrap(), 300);
        assert_eq!(predict_share_delta(100, 1, 3).unwrap(), 33);
        assert_eq!(predict_share_delta(100, 1, 0), Err(OracleError::DivisionByZero));
    }

    #[test]
    fn test_predict_pending_checked_add() {
        assert_eq!(predict_pending(5, 7).unwrap(), 12);
        assert!(predict_pending(u128::MAX, 1).is_err());
    }
}
