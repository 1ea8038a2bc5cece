//! # Accrual Scenarios
//!
//! Verification sequences that drive a [`RewardLedger`] forward and check the
//! observed pending rewards against the oracle. Each sequence is strictly
//! sequential: advance, sample, compare, and stop at the first mismatch.

use crate::accrual;
use crate::error::OracleError;
use crate::ledger::RewardLedger;
use crate::tolerance::Tolerance;
use crate::types::{Address, PoolId};
use anyhow::{Context, Result};

/// One comparison between an observed pending reward and its prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub pool: PoolId,
    pub owner: Address,
    pub block: u64,
    pub expected: u128,
    pub actual: u128,
}

impl Observation {
    pub fn diff(&self) -> u128 {
        self.actual.abs_diff(self.expected)
    }

    pub fn check(&self, tolerance: &Tolerance) -> Result<()> {
        tolerance.check(self.actual, self.expected).with_context(|| {
            format!(
                "pending reward of {} in {} at block {} diverged from the oracle",
                self.owner, self.pool, self.block
            )
        })
    }
}

/// Pool-wide reward predicted for `blocks` blocks at the ledger's current
/// emission parameters.
pub fn predicted_pool_delta<L: RewardLedger>(ledger: &L, pool: PoolId, blocks: u64) -> Result<u128> {
    let state = ledger.reward_state()?;
    let info = ledger.pool(pool)?;
    let delta = accrual::predict_pending_delta(blocks, state.reward_per_block, info.alloc_points, state.total_alloc_points)
        .with_context(|| format!("predicting {} blocks of {}", blocks, pool))?;
    Ok(delta)
}

/// Per-block increment of a position holding `staked` out of `pool_total` staked.
pub fn position_increment<L: RewardLedger>(ledger: &L, pool: PoolId, staked: u128, pool_total: u128) -> Result<u128> {
    let pool_delta = predicted_pool_delta(ledger, pool, 1)?;
    Ok(accrual::predict_share_delta(pool_delta, staked, pool_total)?)
}

/// Samples the owner's pending reward, advances `blocks`, and compares the new
/// pending reward with baseline plus the predicted pool delta. Assumes the
/// owner is the pool's only staker.
pub fn verify_pending_after<L: RewardLedger>(
    ledger: &mut L,
    pool: PoolId,
    owner: &Address,
    blocks: u64,
    tolerance: &Tolerance,
) -> Result<Observation> {
    let baseline = ledger.pending_rewards(pool, owner)?;
    let delta = predicted_pool_delta(ledger, pool, blocks)?;

    ledger.advance_blocks(blocks)?;

    let observation = Observation {
        pool,
        owner: *owner,
        block: ledger.block_number(),
        expected: accrual::predict_pending(baseline, delta)?,
        actual: ledger.pending_rewards(pool, owner)?,
    };
    tracing::debug!(
        %pool,
        %owner,
        block = observation.block,
        expected = observation.expected,
        actual = observation.actual,
        "pending reward observed"
    );
    observation.check(tolerance)?;
    Ok(observation)
}

/// Advances one block at a time for `blocks` blocks. Before each block every
/// owner's pending reward is sampled; after it, each must have grown by that
/// owner's increment within `tolerance`.
pub fn verify_block_by_block<L: RewardLedger>(
    ledger: &mut L,
    pool: PoolId,
    owners: &[Address],
    increments: &[u128],
    blocks: u64,
    tolerance: &Tolerance,
) -> Result<Vec<Observation>> {
    if owners.len() != increments.len() {
        return Err(OracleError::InvalidFixture(format!(
            "{} owners but {} increment amounts",
            owners.len(),
            increments.len()
        ))
        .into());
    }

    let mut observations = Vec::new();
    for _ in 0..blocks {
        let baselines = owners
            .iter()
            .map(|owner| ledger.pending_rewards(pool, owner))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        ledger.advance_blocks(1)?;
        let block = ledger.block_number();

        for ((owner, baseline), increment) in owners.iter().zip(baselines).zip(increments) {
            let observation = Observation {
                pool,
                owner: *owner,
                block,
                expected: accrual::predict_pending(baseline, *increment)?,
                actual: ledger.pending_rewards(pool, owner)?,
            };
            tracing::debug!(
                %pool,
                %owner,
                block,
                expected = observation.expected,
                actual = observation.actual,
                "pending reward observed"
            );
            observation.check(tolerance)?;
            observations.push(observation);
        }
    }

    Ok(observations)
}
