//! # Reward Distribution
//!
//! A market rewards distributor paying a per-block reward speed to suppliers of
//! each market, and the auto rewards distributors that keep those speeds equal
//! to the emission of a chief pool.
//!
//! Every transaction here runs on the chief's chain clock: it mines one block
//! through [`RewardLedger::advance_blocks`] before executing.

use crate::accrual;
use crate::chief::SimulatedChief;
use crate::error::{OracleError, Result};
use crate::ledger::RewardLedger;
use crate::types::{Address, PoolId, ACC_REWARD_PRECISION, U256};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Default)]
struct MarketState {
    supply_speed: u128,
    supply_index: U256,
    last_block: u64,
    total_supply: u128,
    balances: HashMap<Address, u128>,
    supplier_index: HashMap<Address, U256>,
}

impl MarketState {
    fn accrue(&mut self, block: u64) {
        if block <= self.last_block {
            return;
        }
        if self.supply_speed > 0 && self.total_supply > 0 {
            let blocks = block - self.last_block;
            self.supply_index += U256::from(self.supply_speed) * U256::from(blocks) * U256::from(ACC_REWARD_PRECISION)
                / U256::from(self.total_supply);
        }
        self.last_block = block;
    }

    /// Amount earned by `supplier` since its index was last synced.
    fn distribute(&mut self, supplier: Address) -> Result<u128> {
        let balance = self.balances.get(&supplier).copied().unwrap_or(0);
        let previous = self.supplier_index.insert(supplier, self.supply_index).unwrap_or(self.supply_index);
        let earned = U256::from(balance) * (self.supply_index - previous) / U256::from(ACC_REWARD_PRECISION);
        earned
            .try_into()
            .map_err(|_| OracleError::Overflow("supplier reward"))
    }
}

/// Speed pushed by an auto rewards distributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedChanged {
    pub market: Address,
    pub speed: u128,
}

#[derive(Debug, Clone)]
pub struct RewardsDistributor {
    pub address: Address,
    pub admin: Address,
    pub guardian: Address,
    auto_distributors: HashSet<Address>,
    markets: BTreeMap<Address, MarketState>,
    accrued: HashMap<Address, u128>,
}

impl RewardsDistributor {
    pub fn new(address: Address, admin: Address, guardian: Address) -> Self {
        Self {
            address,
            admin,
            guardian,
            auto_distributors: HashSet::new(),
            markets: BTreeMap::new(),
            accrued: HashMap::new(),
        }
    }

    pub fn grant_auto_distributor(&mut self, caller: Address, distributor: Address) -> Result<()> {
        if caller != self.admin {
            return Err(OracleError::Unauthorized {
                caller,
                action: "grant the auto rewards distributor role",
            });
        }
        tracing::info!(%distributor, "granting auto rewards distributor role");
        self.auto_distributors.insert(distributor);
        Ok(())
    }

    pub fn comp_supply_speeds(&self, market: &Address) -> u128 {
        self.markets.get(market).map(|m| m.supply_speed).unwrap_or(0)
    }

    pub fn supply_balance(&self, market: &Address, supplier: &Address) -> u128 {
        self.markets
            .get(market)
            .and_then(|m| m.balances.get(supplier).copied())
            .unwrap_or(0)
    }

    pub fn accrued_of(&self, holder: &Address) -> u128 {
        self.accrued.get(holder).copied().unwrap_or(0)
    }

    fn credit(&mut self, holder: Address, amount: u128) -> Result<()> {
        let entry = self.accrued.entry(holder).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(OracleError::Overflow("accrued rewards"))?;
        Ok(())
    }

    fn apply_speed(&mut self, market: Address, speed: u128, block: u64) {
        let state = self.markets.entry(market).or_default();
        state.accrue(block);
        state.supply_speed = speed;
    }

    /// Sets a market's supply speed; restricted to auto distributors and the admin.
    pub fn set_supply_speed(&mut self, chief: &mut SimulatedChief, caller: Address, market: Address, speed: u128) -> Result<()> {
        chief.advance_blocks(1)?;
        if caller != self.admin && !self.auto_distributors.contains(&caller) {
            return Err(OracleError::Unauthorized {
                caller,
                action: "set supply speeds",
            });
        }
        self.apply_speed(market, speed, chief.block_number());
        tracing::info!(%market, speed, "supply speed set");
        Ok(())
    }

    /// Zeroes a market's supply speed; the guardian may do nothing else.
    pub fn guardian_disable_supply_speed(&mut self, chief: &mut SimulatedChief, caller: Address, market: Address) -> Result<()> {
        chief.advance_blocks(1)?;
        if caller != self.guardian && caller != self.admin {
            return Err(OracleError::Unauthorized {
                caller,
                action: "disable supply speeds",
            });
        }
        self.apply_speed(market, 0, chief.block_number());
        tracing::info!(%market, "supply speed disabled by guardian");
        Ok(())
    }

    /// Supplies `amount` of the reward token into `market` on behalf of `supplier`.
    pub fn mint(&mut self, chief: &mut SimulatedChief, supplier: Address, market: Address, amount: u128) -> Result<()> {
        chief.advance_blocks(1)?;
        chief.reward_token_mut().transfer(supplier, market, amount)?;

        let block = chief.block_number();
        let state = self.markets.entry(market).or_default();
        state.accrue(block);
        let earned = state.distribute(supplier)?;
        *state.balances.entry(supplier).or_insert(0) += amount;
        state.total_supply = state
            .total_supply
            .checked_add(amount)
            .ok_or(OracleError::Overflow("market supply"))?;
        self.credit(supplier, earned)?;

        tracing::debug!(%supplier, %market, amount, "supplied");
        Ok(())
    }

    /// Pays everything `holder` accrued across all markets out of the
    /// distributor's own balance. When the balance cannot cover it the accrued
    /// amount is kept for a later claim. Returns the amount paid.
    pub fn claim_rewards(&mut self, chief: &mut SimulatedChief, holder: Address) -> Result<u128> {
        chief.advance_blocks(1)?;
        let block = chief.block_number();

        let mut earned = 0u128;
        for state in self.markets.values_mut() {
            state.accrue(block);
            earned = earned
                .checked_add(state.distribute(holder)?)
                .ok_or(OracleError::Overflow("claimed rewards"))?;
        }
        self.credit(holder, earned)?;

        let owed = self.accrued_of(&holder);
        let available = chief.reward_token().balance_of(&self.address);
        if owed == 0 || owed > available {
            tracing::debug!(%holder, owed, available, "claim left unpaid");
            return Ok(0);
        }

        chief.reward_token_mut().transfer(self.address, holder, owed)?;
        self.accrued.insert(holder, 0);
        tracing::info!(%holder, owed, "rewards claimed");
        Ok(owed)
    }
}

/// Keeps one market's supply speed equal to the emission of one chief pool.
#[derive(Debug, Clone)]
pub struct AutoRewardsDistributor {
    pub address: Address,
    pub pool: PoolId,
    pub market: Address,
}

impl AutoRewardsDistributor {
    pub fn new(address: Address, pool: PoolId, market: Address) -> Self {
        Self { address, pool, market }
    }

    /// Returns the speed the market should have and whether it differs from
    /// the current one.
    pub fn get_new_reward_speed<L: RewardLedger>(&self, ledger: &L, rewards: &RewardsDistributor) -> Result<(u128, bool)> {
        let state = ledger.reward_state()?;
        let pool = ledger.pool(self.pool)?;
        let speed = accrual::predict_reward_speed(state.reward_per_block, pool.alloc_points, state.total_alloc_points)?;
        Ok((speed, speed != rewards.comp_supply_speeds(&self.market)))
    }

    pub fn set_auto_rewards_distribution(&self, chief: &mut SimulatedChief, rewards: &mut RewardsDistributor) -> Result<SpeedChanged> {
        let (speed, update_needed) = self.get_new_reward_speed(&*chief, rewards)?;
        if !update_needed {
            return Err(OracleError::UpdateNotNeeded);
        }

        rewards.set_supply_speed(chief, self.address, self.market, speed)?;
        Ok(SpeedChanged {
            market: self.market,
            speed,
        })
    }
}
