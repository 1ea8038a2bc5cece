//! Runtime configuration and the incentives fixture used to seed a simulated chief.

use crate::chief::SimulatedChief;
use crate::error::{OracleError, Result};
use crate::tolerance::Tolerance;
use crate::types::{Address, PoolId, DEFAULT_BLOCK_TIME_SECS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ENV_LOGGING: &str = "LOGGING";
pub const ENV_TOLERANCE_BPS: &str = "ACCRUAL_TOLERANCE_BPS";
pub const ENV_BLOCK_TIME_SECS: &str = "ACCRUAL_BLOCK_TIME_SECS";

/// Block reward of the mainnet incentives fixture, 26.15 tokens.
pub const FIXTURE_BLOCK_REWARD: u128 = 26_150_000_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolFixture {
    pub pool: PoolId,
    pub alloc_points: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentivesFixture {
    pub block_reward: u128,
    pub pools: Vec<PoolFixture>,
}

impl Default for IncentivesFixture {
    fn default() -> Self {
        let pools = [(3, 1000), (12, 250), (13, 250), (14, 1000), (15, 100), (16, 500), (17, 250)]
            .into_iter()
            .map(|(pool, alloc_points)| PoolFixture {
                pool: PoolId(pool),
                alloc_points,
            })
            .collect();
        Self {
            block_reward: FIXTURE_BLOCK_REWARD,
            pools,
        }
    }
}

impl IncentivesFixture {
    pub fn total_alloc_points(&self) -> u128 {
        self.pools.iter().map(|p| p.alloc_points).sum()
    }

    pub fn alloc_points(&self, pool: PoolId) -> Option<u128> {
        self.pools.iter().find(|p| p.pool == pool).map(|p| p.alloc_points)
    }

    /// Creates every pool up to the highest fixture id, padding the gaps with
    /// zero-weight pools, then applies the fixture weights and block reward.
    /// Pools the chief already has are re-weighted in place.
    pub fn apply(&self, chief: &mut SimulatedChief, governor: Address) -> Result<()> {
        let mut weights = BTreeMap::new();
        for fixture in &self.pools {
            if weights.insert(fixture.pool, fixture.alloc_points).is_some() {
                return Err(OracleError::InvalidFixture(format!("{} listed twice", fixture.pool)));
            }
        }

        let existing = chief.pool_count() as u64;
        for (&pool, &alloc_points) in weights.range(..PoolId(existing)) {
            chief.set(governor, pool, alloc_points)?;
        }

        let Some(highest) = weights.keys().next_back().copied() else {
            return chief.update_block_reward(governor, self.block_reward);
        };
        for id in existing..=highest.0 {
            let alloc_points = weights.get(&PoolId(id)).copied().unwrap_or(0);
            chief.add_pool(governor, alloc_points)?;
        }

        chief.update_block_reward(governor, self.block_reward)?;
        tracing::info!(
            pools = chief.pool_count(),
            total_alloc_points = chief.total_alloc_points(),
            block_reward = self.block_reward,
            "incentives fixture applied"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Emit info-level logs; otherwise only warnings surface.
    pub logging: bool,
    pub tolerance: Tolerance,
    pub block_time_secs: u64,
    pub fixture: IncentivesFixture,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            logging: false,
            tolerance: Tolerance::default(),
            block_time_secs: DEFAULT_BLOCK_TIME_SECS,
            fixture: IncentivesFixture::default(),
        }
    }
}

impl OracleConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| OracleError::Config(e.to_string()))
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from defaults overridden by whatever `lookup` returns
    /// for the environment keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_LOGGING) {
            config.logging = matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(value) = lookup(ENV_TOLERANCE_BPS) {
            let bps = value
                .trim()
                .parse::<u128>()
                .map_err(|e| OracleError::Config(format!("{}={:?}: {}", ENV_TOLERANCE_BPS, value, e)))?;
            config.tolerance = Tolerance::relative_bps(bps);
        }
        if let Some(value) = lookup(ENV_BLOCK_TIME_SECS) {
            config.block_time_secs = value
                .trim()
                .parse::<u64>()
                .map_err(|e| OracleError::Config(format!("{}={:?}: {}", ENV_BLOCK_TIME_SECS, value, e)))?;
        }

        Ok(config)
    }

    /// A fresh chief ticking at the configured block time.
    pub fn chief(&self, governor: Address) -> SimulatedChief {
        SimulatedChief::new(governor).with_block_time(self.block_time_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ONE_TOKEN;
    use std::collections::HashMap;

    #[test]
    fn test_default_fixture_totals() {
        let fixture = IncentivesFixture::default();
        assert_eq!(fixture.total_alloc_points(), 3350);
        assert_eq!(fixture.alloc_points(PoolId(15)), Some(100));
        assert_eq!(fixture.alloc_points(PoolId(0)), None);
    }

    #[test]
    fn test_apply_pads_missing_pools() {
        let governor = Address::from_label("governor");
        let mut chief = SimulatedChief::new(governor);
        IncentivesFixture::default().apply(&mut chief, governor).unwrap();

        assert_eq!(chief.pool_count(), 18);
        assert_eq!(chief.total_alloc_points(), 3350);
        assert_eq!(chief.reward_per_block(), FIXTURE_BLOCK_REWARD);
        assert_eq!(chief.pool_info(PoolId(0)).unwrap().alloc_points, 0);
        assert_eq!(chief.pool_info(PoolId(16)).unwrap().alloc_points, 500);
    }

    #[test]
    fn test_apply_reweights_existing_pools() {
        let governor = Address::from_label("governor");
        let mut chief = SimulatedChief::new(governor);
        chief.add_pool(governor, 7).unwrap();

        let fixture = IncentivesFixture {
            block_reward: ONE_TOKEN,
            pools: vec![
                PoolFixture { pool: PoolId(0), alloc_points: 10 },
                PoolFixture { pool: PoolId(2), alloc_points: 30 },
            ],
        };
        fixture.apply(&mut chief, governor).unwrap();

        assert_eq!(chief.pool_count(), 3);
        assert_eq!(chief.total_alloc_points(), 40);
    }

    #[test]
    fn test_apply_rejects_duplicates() {
        let governor = Address::from_label("governor");
        let mut chief = SimulatedChief::new(governor);
        let fixture = IncentivesFixture {
            block_reward: ONE_TOKEN,
            pools: vec![
                PoolFixture { pool: PoolId(1), alloc_points: 10 },
                PoolFixture { pool: PoolId(1), alloc_points: 20 },
            ],
        };
        assert!(matches!(fixture.apply(&mut chief, governor), Err(OracleError::InvalidFixture(_))));
        assert_eq!(chief.pool_count(), 0);
    }

    #[test]
    fn test_from_json_partial() {
        let config = OracleConfig::from_json(
            r#"{
                "logging": true,
                "tolerance": { "absolute": { "max_diff": 5 } },
                "fixture": { "block_reward": 1000, "pools": [{ "pool": 0, "alloc_points": 1 }] }
            }"#,
        )
        .unwrap();

        assert!(config.logging);
        assert_eq!(config.tolerance, Tolerance::Absolute { max_diff: 5 });
        assert_eq!(config.block_time_secs, DEFAULT_BLOCK_TIME_SECS);
        assert_eq!(config.fixture.total_alloc_points(), 1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(OracleConfig::from_json("{ not json"), Err(OracleError::Config(_))));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = [(ENV_LOGGING, "true"), (ENV_TOLERANCE_BPS, "25"), (ENV_BLOCK_TIME_SECS, "12")]
            .into_iter()
            .collect();
        let config = OracleConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert!(config.logging);
        assert_eq!(config.tolerance, Tolerance::relative_bps(25));
        assert_eq!(config.block_time_secs, 12);

        let err = OracleConfig::from_lookup(|key| (key == ENV_BLOCK_TIME_SECS).then(|| "soon".to_string())).unwrap_err();
        assert!(matches!(err, OracleError::Config(_)));
    }
}
