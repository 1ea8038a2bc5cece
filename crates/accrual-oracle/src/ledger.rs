use crate::error::Result;
use crate::types::{Address, Pool, PoolId, RewardState};

/// The chain state the oracle observes. Decouples the verification logic from
/// the data source so scenarios run against the in-memory distributor or any
/// other implementation exposing the same queries.
pub trait RewardLedger {
    /// Pending reward of `owner` in `pool` at the current block.
    fn pending_rewards(&self, pool: PoolId, owner: &Address) -> Result<u128>;

    /// Current reward per block and total allocation points.
    fn reward_state(&self) -> Result<RewardState>;

    /// Allocation weight of a single pool.
    fn pool(&self, pool: PoolId) -> Result<Pool>;

    fn block_number(&self) -> u64;

    /// Mine `blocks` empty blocks.
    fn advance_blocks(&mut self, blocks: u64) -> Result<()>;
}
