use crate::chief::SimulatedChief;
use crate::error::{OracleError, Result};
use crate::types::{Address, PoolId, ONE_TOKEN};

/// Holds a single one-token position in a chief pool and forwards every harvest
/// to a fixed beneficiary, typically a downstream rewards distributor.
#[derive(Debug, Clone)]
pub struct StakingTokenWrapper {
    pub address: Address,
    pub beneficiary: Address,
    pub pool: Option<PoolId>,
}

impl StakingTokenWrapper {
    pub fn new(address: Address, beneficiary: Address) -> Self {
        Self {
            address,
            beneficiary,
            pool: None,
        }
    }

    /// Mints the wrapper token and stakes it in `pool`.
    pub fn init(&mut self, chief: &mut SimulatedChief, pool: PoolId) -> Result<()> {
        chief.mint_stake(pool, self.address, ONE_TOKEN)?;
        chief.deposit(self.address, pool, ONE_TOKEN)?;
        self.pool = Some(pool);
        tracing::info!(wrapper = %self.address, %pool, "staking token wrapper initialised");
        Ok(())
    }

    pub fn staked_pool(&self) -> Result<PoolId> {
        self.pool
            .ok_or_else(|| OracleError::InvalidFixture(format!("wrapper {} was never initialised", self.address)))
    }

    /// Harvests the wrapper's position to the beneficiary; returns the amount paid.
    pub fn harvest(&self, chief: &mut SimulatedChief) -> Result<u128> {
        let pool = self.staked_pool()?;
        chief.harvest(self.address, pool, self.beneficiary)
    }
}
