use crate::chief::SimulatedChief;
use crate::distributor::{AutoRewardsDistributor, RewardsDistributor, SpeedChanged};
use crate::error::{OracleError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A timestamped schedule of decreasing block rewards. Once the next
/// timestamp passes, anyone may apply the next rate to the chief and re-sync
/// the auto rewards distributors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSchedule {
    entries: BTreeMap<u64, u128>,
}

impl RewardSchedule {
    pub fn new(entries: impl IntoIterator<Item = (u64, u128)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_reward_timestamp(&self) -> Option<u64> {
        self.entries.keys().next().copied()
    }

    pub fn next_rewards_rate(&self) -> Option<u128> {
        self.entries.values().next().copied()
    }

    pub fn is_reward_decrease_available(&self, now: u64) -> bool {
        self.next_reward_timestamp().is_some_and(|ts| now >= ts)
    }

    /// Applies the next scheduled rate to the chief, then pushes the new speed
    /// through every auto distributor whose speed went stale. Returns the
    /// speed changes in distributor order.
    ///
    /// The whole call is one transaction: on any error the schedule, the
    /// chief and the rewards distributor are left exactly as they were.
    pub fn auto_decrease_rewards(
        &mut self,
        chief: &mut SimulatedChief,
        distributors: &[AutoRewardsDistributor],
        rewards: &mut RewardsDistributor,
    ) -> Result<Vec<SpeedChanged>> {
        let schedule_before = self.clone();
        let chief_before = chief.clone();
        let rewards_before = rewards.clone();

        let result = self.decrease_and_sync(chief, distributors, rewards);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "reward decrease reverted");
            *self = schedule_before;
            *chief = chief_before;
            *rewards = rewards_before;
        }
        result
    }

    fn decrease_and_sync(
        &mut self,
        chief: &mut SimulatedChief,
        distributors: &[AutoRewardsDistributor],
        rewards: &mut RewardsDistributor,
    ) -> Result<Vec<SpeedChanged>> {
        let now = chief.timestamp();
        if !self.is_reward_decrease_available(now) {
            return Err(OracleError::NoDecreaseAvailable(now));
        }
        let Some((timestamp, rate)) = self.entries.pop_first() else {
            return Err(OracleError::NoDecreaseAvailable(now));
        };

        tracing::info!(timestamp, rate, remaining = self.entries.len(), "decreasing block reward");
        let governor = chief.governor;
        chief.update_block_reward(governor, rate)?;

        let mut changes = Vec::new();
        for distributor in distributors {
            let (_, update_needed) = distributor.get_new_reward_speed(&*chief, rewards)?;
            if update_needed {
                changes.push(distributor.set_auto_rewards_distribution(chief, rewards)?);
            }
        }
        Ok(changes)
    }
}
