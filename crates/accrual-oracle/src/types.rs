use crate::error::{OracleError, Result};
use ruint::Uint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub type U256 = Uint<256, 4>;

/// Index of a pool in the distributor's pool table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub u64);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid {}", self.0)
    }
}

/// A 20-byte account address, rendered as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    /// Deterministic address derived from a human readable label. Labels longer
    /// than 20 bytes are truncated.
    pub fn from_label(label: &str) -> Self {
        let mut bytes = [0u8; 20];
        let raw = label.as_bytes();
        let len = raw.len().min(20);
        bytes[20 - len..].copy_from_slice(&raw[..len]);
        Address(bytes)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl FromStr for Address {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(stripped)
            .map_err(|e| OracleError::Config(format!("invalid address {s}: {e}")))?;
        let bytes: [u8; 20] = raw
            .try_into()
            .map_err(|_| OracleError::Config(format!("address {s} is not 20 bytes")))?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    pub id: PoolId,
    pub alloc_points: u128,
}

impl Pool {
    pub fn new(id: PoolId, alloc_points: u128) -> Self {
        Self { id, alloc_points }
    }
}

/// Emission parameters shared by every pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardState {
    pub reward_per_block: u128,
    pub total_alloc_points: u128,
}

impl RewardState {
    pub fn new(reward_per_block: u128, total_alloc_points: u128) -> Self {
        Self {
            reward_per_block,
            total_alloc_points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub owner: Address,
    pub pool: PoolId,
    pub staked: u128,
    pub pending_reward: u128,
}

impl Position {
    pub fn new(owner: Address, pool: PoolId) -> Self {
        Self {
            owner,
            pool,
            staked: 0,
            pending_reward: 0,
        }
    }

    pub fn with_stake(mut self, staked: u128) -> Self {
        self.staked = staked;
        self
    }

    pub fn with_pending(mut self, pending_reward: u128) -> Self {
        self.pending_reward = pending_reward;
        self
    }
}

// Constants shared by the oracle and the simulated contracts
pub const ONE_TOKEN: u128 = 1_000_000_000_000_000_000; // 1e18
pub const ACC_REWARD_PRECISION: u128 = 100_000 * ONE_TOKEN; // 1e23
pub const HARVEST_BLOCK_SLACK: u64 = 1; // the harvest transaction mines its own block
pub const BASIS_POINTS: u128 = 10000; // 100% in basis points
pub const DEFAULT_TOLERANCE_BPS: u128 = 10; // 0.1%
pub const DEFAULT_TOLERANCE_FLOOR: u128 = 1000;
pub const DEFAULT_BLOCK_TIME_SECS: u64 = 13;
