//! Example usage of the accrual oracle
//!
//! This example demonstrates how to:
//! 1. Load configuration and install logging
//! 2. Seed a simulated chief with the incentives fixture
//! 3. Stake and compare pending rewards against the oracle
//! 4. Predict a harvest before sending it

use accrual_oracle::scenario::verify_pending_after;
use accrual_oracle::wrapper::StakingTokenWrapper;
use accrual_oracle::{init_logging, predict_harvest, predict_pending_delta, Address, OracleConfig, PoolId, RewardLedger};

fn main() -> anyhow::Result<()> {
    println!("Accrual Oracle Usage Example");
    println!("============================");

    let config = OracleConfig::from_env()?;
    init_logging(&config);

    println!("\n1. Reference prediction");
    let delta = predict_pending_delta(10, 26_150_000_000_000_000_000, 1000, 2000)?;
    println!("   10 blocks at 26.15 TRIBE/block, 1000 of 2000 points: {}", delta);

    println!("\n2. Seeding the incentives fixture");
    let governor = Address::from_label("feiDAOTimelock");
    let mut chief = config.chief(governor);
    config.fixture.apply(&mut chief, governor)?;
    let state = chief.reward_state()?;
    println!("   Pools: {}", chief.pool_count());
    println!("   Reward per block: {}", state.reward_per_block);
    println!("   Total allocation points: {}", state.total_alloc_points);

    println!("\n3. Staking through a wrapper");
    let pool = PoolId(3);
    let mut wrapper = StakingTokenWrapper::new(Address::from_label("stakingTokenWrapper"), Address::from_label("delegator"));
    wrapper.init(&mut chief, pool)?;

    for blocks in [1u64, 10, 100] {
        let observation = verify_pending_after(&mut chief, pool, &wrapper.address, blocks, &config.tolerance)?;
        println!(
            "   +{} blocks: expected {}, actual {}, diff {}",
            blocks,
            observation.expected,
            observation.actual,
            observation.diff()
        );
    }

    println!("\n4. Predicting a harvest");
    wrapper.harvest(&mut chief)?;
    chief.advance_blocks(20)?;
    let alloc = chief.pool(pool)?.alloc_points;
    let predicted = predict_harvest(20, state.reward_per_block, alloc, state.total_alloc_points)?;
    let paid = wrapper.harvest(&mut chief)?;
    println!("   Predicted {}, paid {}", predicted, paid);

    Ok(())
}
