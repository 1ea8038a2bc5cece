//! # Simulated Chief
//!
//! An in-memory block-reward distributor. Pools receive a share of the global
//! per-block emission proportional to their allocation points, and stakers
//! receive a share of their pool's emission proportional to their stake.
//!
//! Every state-changing call is a transaction and mines exactly one block
//! before it executes, the way an automining development node behaves. Queries
//! never mine.

use crate::accrual;
use crate::error::{OracleError, Result};
use crate::ledger::RewardLedger;
use crate::token::TokenLedger;
use crate::types::{
    Address, Pool, PoolId, Position, RewardState, ACC_REWARD_PRECISION, DEFAULT_BLOCK_TIME_SECS, U256,
};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PoolInfo {
    pub alloc_points: u128,
    pub acc_reward_per_share: U256,
    pub last_reward_block: u64,
    pub total_staked: u128,
    pub staked_token: TokenLedger,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub amount: u128,
    pub reward_debt: U256,
    /// Reward settled on earlier stake changes but not yet harvested.
    pub accrued: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChiefEvent {
    PoolAdded { pool: PoolId, alloc_points: u128 },
    PoolSet { pool: PoolId, alloc_points: u128 },
    BlockRewardUpdated { old: u128, new: u128 },
    Deposit { owner: Address, pool: PoolId, amount: u128 },
    Withdraw { owner: Address, pool: PoolId, amount: u128, to: Address },
    Harvest { owner: Address, pool: PoolId, amount: u128 },
}

#[derive(Debug, Clone)]
pub struct SimulatedChief {
    pub address: Address,
    pub governor: Address,
    block_number: u64,
    timestamp: u64,
    block_time_secs: u64,
    reward_per_block: u128,
    total_alloc_points: u128,
    pools: Vec<PoolInfo>,
    users: HashMap<(PoolId, Address), UserInfo>,
    reward_token: TokenLedger,
    events: Vec<ChiefEvent>,
}

impl SimulatedChief {
    pub fn new(governor: Address) -> Self {
        Self {
            address: Address::from_label("tribalChief"),
            governor,
            block_number: 0,
            timestamp: 0,
            block_time_secs: DEFAULT_BLOCK_TIME_SECS,
            reward_per_block: 0,
            total_alloc_points: 0,
            pools: Vec::new(),
            users: HashMap::new(),
            reward_token: TokenLedger::new("TRIBE"),
            events: Vec::new(),
        }
    }

    pub fn with_genesis(mut self, block_number: u64, timestamp: u64) -> Self {
        self.block_number = block_number;
        self.timestamp = timestamp;
        self
    }

    pub fn with_block_time(mut self, block_time_secs: u64) -> Self {
        self.block_time_secs = block_time_secs;
        self
    }

    // ------------------------------------------------------------------
    // Chain clock
    // ------------------------------------------------------------------

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn mine_block(&mut self) {
        self.block_number += 1;
        self.timestamp += self.block_time_secs;
    }

    /// Mine one block stamped with `timestamp`.
    pub fn increase_time_to(&mut self, timestamp: u64) -> Result<()> {
        if timestamp <= self.timestamp {
            return Err(OracleError::InvalidFixture(format!(
                "timestamp {} is not after the latest block timestamp {}",
                timestamp, self.timestamp
            )));
        }
        self.block_number += 1;
        self.timestamp = timestamp;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn reward_per_block(&self) -> u128 {
        self.reward_per_block
    }

    pub fn total_alloc_points(&self) -> u128 {
        self.total_alloc_points
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn pool_info(&self, pool: PoolId) -> Result<&PoolInfo> {
        self.pools
            .get(pool.0 as usize)
            .ok_or(OracleError::UnknownPool(pool))
    }

    fn pool_info_mut(&mut self, pool: PoolId) -> Result<&mut PoolInfo> {
        self.pools
            .get_mut(pool.0 as usize)
            .ok_or(OracleError::UnknownPool(pool))
    }

    pub fn user_info(&self, pool: PoolId, owner: &Address) -> UserInfo {
        self.users.get(&(pool, *owner)).cloned().unwrap_or_default()
    }

    pub fn total_staked(&self, pool: PoolId) -> Result<u128> {
        Ok(self.pool_info(pool)?.total_staked)
    }

    pub fn position(&self, pool: PoolId, owner: &Address) -> Result<Position> {
        let user = self.user_info(pool, owner);
        let pending = self.pending_rewards(pool, owner)?;
        Ok(Position::new(*owner, pool)
            .with_stake(user.amount)
            .with_pending(pending))
    }

    pub fn reward_token(&self) -> &TokenLedger {
        &self.reward_token
    }

    pub fn reward_token_mut(&mut self) -> &mut TokenLedger {
        &mut self.reward_token
    }

    pub fn staked_token(&self, pool: PoolId) -> Result<&TokenLedger> {
        Ok(&self.pool_info(pool)?.staked_token)
    }

    pub fn events(&self) -> &[ChiefEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ChiefEvent> {
        std::mem::take(&mut self.events)
    }

    /// Credit `amount` of a pool's staked token to `to`, outside of any transaction.
    pub fn mint_stake(&mut self, pool: PoolId, to: Address, amount: u128) -> Result<()> {
        self.pool_info_mut(pool)?.staked_token.mint(to, amount)
    }

    // ------------------------------------------------------------------
    // Accounting
    // ------------------------------------------------------------------

    /// Per-share accumulator of `pool` as if it were updated at the current block.
    fn accumulated_per_share(&self, pool: PoolId) -> Result<U256> {
        let info = self.pool_info(pool)?;
        if self.block_number <= info.last_reward_block || info.total_staked == 0 || info.alloc_points == 0 {
            return Ok(info.acc_reward_per_share);
        }

        let blocks = self.block_number - info.last_reward_block;
        let reward = accrual::predict_pending_delta(
            blocks,
            self.reward_per_block,
            info.alloc_points,
            self.total_alloc_points,
        )?;

        Ok(info.acc_reward_per_share
            + U256::from(reward) * U256::from(ACC_REWARD_PRECISION) / U256::from(info.total_staked))
    }

    fn update_pool(&mut self, pool: PoolId) -> Result<()> {
        let acc = self.accumulated_per_share(pool)?;
        let block = self.block_number;
        let info = self.pool_info_mut(pool)?;
        info.acc_reward_per_share = acc;
        info.last_reward_block = block;
        tracing::debug!(%pool, block, "pool updated");
        Ok(())
    }

    fn mass_update_pools(&mut self) -> Result<()> {
        for index in 0..self.pools.len() {
            self.update_pool(PoolId(index as u64))?;
        }
        Ok(())
    }

    fn accrued_share(amount: u128, acc: U256) -> U256 {
        U256::from(amount) * acc / U256::from(ACC_REWARD_PRECISION)
    }

    fn pending_with(user: &UserInfo, acc: U256) -> Result<u128> {
        let unsettled = Self::accrued_share(user.amount, acc).saturating_sub(user.reward_debt);
        let unsettled: u128 = unsettled
            .try_into()
            .map_err(|_| OracleError::Overflow("pending rewards"))?;
        user.accrued
            .checked_add(unsettled)
            .ok_or(OracleError::Overflow("pending rewards"))
    }

    /// Moves everything the user earned so far into `accrued`. The pool must
    /// already be updated to the current block.
    fn settle(&mut self, pool: PoolId, owner: Address) -> Result<()> {
        let acc = self.pool_info(pool)?.acc_reward_per_share;
        let user = self.users.entry((pool, owner)).or_default();
        user.accrued = Self::pending_with(user, acc)?;
        user.reward_debt = Self::accrued_share(user.amount, acc);
        Ok(())
    }

    fn reset_debt(&mut self, pool: PoolId, owner: Address) -> Result<()> {
        let acc = self.pool_info(pool)?.acc_reward_per_share;
        let user = self.users.entry((pool, owner)).or_default();
        user.reward_debt = Self::accrued_share(user.amount, acc);
        Ok(())
    }

    fn ensure_governor(&self, caller: Address, action: &'static str) -> Result<()> {
        if caller != self.governor {
            return Err(OracleError::Unauthorized { caller, action });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Governance transactions
    // ------------------------------------------------------------------

    pub fn add_pool(&mut self, caller: Address, alloc_points: u128) -> Result<PoolId> {
        self.mine_block();
        self.ensure_governor(caller, "add pools")?;
        self.mass_update_pools()?;

        let total_alloc_points = self
            .total_alloc_points
            .checked_add(alloc_points)
            .ok_or(OracleError::Overflow("total allocation points"))?;

        let pool = PoolId(self.pools.len() as u64);
        self.pools.push(PoolInfo {
            alloc_points,
            acc_reward_per_share: U256::ZERO,
            last_reward_block: self.block_number,
            total_staked: 0,
            staked_token: TokenLedger::new(&format!("STAKE-{}", pool.0)),
        });
        self.total_alloc_points = total_alloc_points;

        tracing::info!(%pool, alloc_points, "pool added");
        self.events.push(ChiefEvent::PoolAdded { pool, alloc_points });
        Ok(pool)
    }

    pub fn set(&mut self, caller: Address, pool: PoolId, alloc_points: u128) -> Result<()> {
        self.mine_block();
        self.ensure_governor(caller, "set pool allocation")?;
        let previous = self.pool_info(pool)?.alloc_points;
        self.mass_update_pools()?;

        self.total_alloc_points = (self.total_alloc_points - previous)
            .checked_add(alloc_points)
            .ok_or(OracleError::Overflow("total allocation points"))?;
        self.pool_info_mut(pool)?.alloc_points = alloc_points;

        tracing::info!(%pool, previous, alloc_points, total = self.total_alloc_points, "pool allocation set");
        self.events.push(ChiefEvent::PoolSet { pool, alloc_points });
        Ok(())
    }

    pub fn update_block_reward(&mut self, caller: Address, reward_per_block: u128) -> Result<()> {
        self.mine_block();
        self.ensure_governor(caller, "update block reward")?;
        self.mass_update_pools()?;

        let old = self.reward_per_block;
        self.reward_per_block = reward_per_block;

        tracing::info!(old, new = reward_per_block, "block reward updated");
        self.events.push(ChiefEvent::BlockRewardUpdated {
            old,
            new: reward_per_block,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Staker transactions
    // ------------------------------------------------------------------

    pub fn deposit(&mut self, owner: Address, pool: PoolId, amount: u128) -> Result<()> {
        self.mine_block();
        let chief = self.address;
        self.pool_info(pool)?;
        self.update_pool(pool)?;
        self.settle(pool, owner)?;

        let info = self.pool_info_mut(pool)?;
        info.staked_token.transfer(owner, chief, amount)?;
        info.total_staked = info
            .total_staked
            .checked_add(amount)
            .ok_or(OracleError::Overflow("pool stake"))?;
        self.users.entry((pool, owner)).or_default().amount += amount;
        self.reset_debt(pool, owner)?;

        tracing::debug!(%owner, %pool, amount, "deposit");
        self.events.push(ChiefEvent::Deposit { owner, pool, amount });
        Ok(())
    }

    /// Pays out pending reward to `to` and returns the amount paid.
    pub fn harvest(&mut self, owner: Address, pool: PoolId, to: Address) -> Result<u128> {
        self.mine_block();
        self.pool_info(pool)?;
        self.update_pool(pool)?;
        self.settle(pool, owner)?;
        self.pay_accrued(owner, pool, to)
    }

    pub fn withdraw(&mut self, owner: Address, pool: PoolId, amount: u128, to: Address) -> Result<()> {
        self.mine_block();
        self.pool_info(pool)?;
        self.update_pool(pool)?;
        self.settle(pool, owner)?;
        self.withdraw_stake(owner, pool, amount, to)
    }

    /// Returns the whole stake and all pending reward; returns `(withdrawn, harvested)`.
    pub fn withdraw_all_and_harvest(&mut self, owner: Address, pool: PoolId, to: Address) -> Result<(u128, u128)> {
        self.mine_block();
        self.pool_info(pool)?;
        self.update_pool(pool)?;
        self.settle(pool, owner)?;

        let amount = self.user_info(pool, &owner).amount;
        self.withdraw_stake(owner, pool, amount, to)?;
        let harvested = self.pay_accrued(owner, pool, to)?;
        Ok((amount, harvested))
    }

    fn withdraw_stake(&mut self, owner: Address, pool: PoolId, amount: u128, to: Address) -> Result<()> {
        let staked = self.user_info(pool, &owner).amount;
        if staked < amount {
            return Err(OracleError::InsufficientStake {
                owner,
                pool,
                staked,
                required: amount,
            });
        }

        let chief = self.address;
        let info = self.pool_info_mut(pool)?;
        info.staked_token.transfer(chief, to, amount)?;
        info.total_staked -= amount;
        self.users.entry((pool, owner)).or_default().amount -= amount;
        self.reset_debt(pool, owner)?;

        tracing::debug!(%owner, %pool, amount, %to, "withdraw");
        self.events.push(ChiefEvent::Withdraw { owner, pool, amount, to });
        Ok(())
    }

    fn pay_accrued(&mut self, owner: Address, pool: PoolId, to: Address) -> Result<u128> {
        let user = self.users.entry((pool, owner)).or_default();
        let amount = std::mem::take(&mut user.accrued);
        if amount > 0 {
            self.reward_token.mint(to, amount)?;
        }

        tracing::info!(%owner, %pool, amount, block = self.block_number, "harvest");
        self.events.push(ChiefEvent::Harvest { owner, pool, amount });
        Ok(amount)
    }
}

impl RewardLedger for SimulatedChief {
    fn pending_rewards(&self, pool: PoolId, owner: &Address) -> Result<u128> {
        let acc = self.accumulated_per_share(pool)?;
        Self::pending_with(&self.user_info(pool, owner), acc)
    }

    fn reward_state(&self) -> Result<RewardState> {
        Ok(RewardState::new(self.reward_per_block, self.total_alloc_points))
    }

    fn pool(&self, pool: PoolId) -> Result<Pool> {
        Ok(Pool::new(pool, self.pool_info(pool)?.alloc_points))
    }

    fn block_number(&self) -> u64 {
        self.block_number
    }

    fn advance_blocks(&mut self, blocks: u64) -> Result<()> {
        for _ in 0..blocks {
            self.mine_block();
        }
        Ok(())
    }
}
