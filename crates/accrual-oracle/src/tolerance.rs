//! Approximate-equality policy for comparing observed contract state against
//! oracle predictions.

use crate::error::{OracleError, Result};
use crate::types::{BASIS_POINTS, DEFAULT_TOLERANCE_BPS, DEFAULT_TOLERANCE_FLOOR, U256};
use serde::{Deserialize, Serialize};

// Must stay externally tagged; internally tagged enums cannot carry u128 fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tolerance {
    /// Values must match exactly.
    Exact,
    /// `|actual - expected| <= max_diff`.
    Absolute { max_diff: u128 },
    /// `|actual - expected| <= expected * bps / 10000`. A zero expectation
    /// falls back to the absolute `floor`.
    Relative { bps: u128, floor: u128 },
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::Relative {
            bps: DEFAULT_TOLERANCE_BPS,
            floor: DEFAULT_TOLERANCE_FLOOR,
        }
    }
}

impl Tolerance {
    pub fn relative_bps(bps: u128) -> Self {
        Tolerance::Relative {
            bps,
            floor: DEFAULT_TOLERANCE_FLOOR,
        }
    }

    /// Width of the accepted band around `expected`.
    pub fn allowed(&self, expected: u128) -> u128 {
        match *self {
            Tolerance::Exact => 0,
            Tolerance::Absolute { max_diff } => max_diff,
            Tolerance::Relative { floor, .. } if expected == 0 => floor,
            Tolerance::Relative { bps, .. } => {
                let band = U256::from(expected) * U256::from(bps) / U256::from(BASIS_POINTS);
                band.try_into().unwrap_or(u128::MAX)
            }
        }
    }

    pub fn check(&self, actual: u128, expected: u128) -> Result<()> {
        let diff = actual.abs_diff(expected);
        let allowed = self.allowed(expected);

        if diff > allowed {
            tracing::warn!(actual, expected, diff, allowed, "observed value outside tolerance");
            return Err(OracleError::ToleranceExceeded {
                actual,
                expected,
                diff,
                allowed,
            });
        }

        Ok(())
    }

    pub fn is_within(&self, actual: u128, expected: u128) -> bool {
        actual.abs_diff(expected) <= self.allowed(expected)
    }
}
