//! Common test utilities for accrual oracle tests

// Silence warnings for unused code in the common module
#![allow(dead_code)]

use accrual_oracle_core::chief::SimulatedChief;
use accrual_oracle_core::config::IncentivesFixture;
use accrual_oracle_core::types::{Address, PoolId, ONE_TOKEN};
use anyhow::Result;

/// Pool the fixture stakers use; weighted 1000 of 3350.
pub const STAKED_POOL: PoolId = PoolId(3);

pub fn governor() -> Address {
    Address::from_label("feiDAOTimelock")
}

pub fn user(index: usize) -> Address {
    Address::from_label(&format!("user{}", index))
}

/// A chief seeded with the default incentives fixture.
pub fn fixture_chief() -> Result<SimulatedChief> {
    let mut chief = SimulatedChief::new(governor()).with_genesis(14_000_000, 1_650_000_000);
    IncentivesFixture::default().apply(&mut chief, governor())?;
    Ok(chief)
}

/// Mints and deposits `amounts[i]` whole tokens for `user(i)` in `pool`.
pub fn stake_users(chief: &mut SimulatedChief, pool: PoolId, amounts: &[u128]) -> Result<Vec<Address>> {
    let mut owners = Vec::with_capacity(amounts.len());
    for (i, &amount) in amounts.iter().enumerate() {
        let owner = user(i);
        let amount = amount * ONE_TOKEN;
        chief.mint_stake(pool, owner, amount)?;
        chief.deposit(owner, pool, amount)?;
        owners.push(owner);
    }
    Ok(owners)
}

pub fn assert_within_tolerance(actual: u128, expected: u128, tolerance_bps: u128) {
    let tolerance = expected * tolerance_bps / 10000;
    let lower_bound = expected.saturating_sub(tolerance);
    let upper_bound = expected.saturating_add(tolerance);

    assert!(
        actual >= lower_bound && actual <= upper_bound,
        "Value {} not within {} bps of expected {}. Range: [{}, {}]",
        actual,
        tolerance_bps,
        expected,
        lower_bound,
        upper_bound
    );
}
