//! Simulated PCV deposit supplying protocol-controlled tokens to a lending venue.

use crate::error::{OracleError, Result};
use crate::token::TokenLedger;
use crate::types::{Address, U256, ONE_TOKEN};

/// Holds idle tokens and supplies them to a lending market whose shares are
/// minted at `exchange_rate` (underlying per share, scaled by 1e18). Minting
/// truncates, so the reported balance can trail the deposited amount by dust;
/// withdrawals redeem against the underlying actually supplied, so the whole
/// deposit always comes back out exactly.
#[derive(Debug, Clone)]
pub struct PcvDeposit {
    pub address: Address,
    pub governor: Address,
    pub exchange_rate: u128,
    shares: u128,
    supplied: u128,
}

impl PcvDeposit {
    pub fn new(address: Address, governor: Address, exchange_rate: u128) -> Self {
        Self {
            address,
            governor,
            exchange_rate,
            shares: 0,
            supplied: 0,
        }
    }

    fn venue(&self) -> Address {
        Address::from_label("pcv-venue")
    }

    fn shares_for(&self, underlying: u128) -> Result<u128> {
        if self.exchange_rate == 0 {
            return Err(OracleError::DivisionByZero);
        }
        (U256::from(underlying) * U256::from(ONE_TOKEN) / U256::from(self.exchange_rate))
            .try_into()
            .map_err(|_| OracleError::Overflow("venue shares"))
    }

    fn underlying_for(&self, shares: u128) -> Result<u128> {
        (U256::from(shares) * U256::from(self.exchange_rate) / U256::from(ONE_TOKEN))
            .try_into()
            .map_err(|_| OracleError::Overflow("venue underlying"))
    }

    /// Underlying value of the supplied position.
    pub fn balance(&self) -> Result<u128> {
        self.underlying_for(self.shares)
    }

    /// Underlying held by the venue on the deposit's behalf.
    pub fn supplied(&self) -> u128 {
        self.supplied
    }

    /// Supplies the deposit's entire idle balance; returns the amount supplied.
    pub fn deposit(&mut self, token: &mut TokenLedger) -> Result<u128> {
        let amount = token.balance_of(&self.address);
        if amount == 0 {
            return Ok(0);
        }

        let minted = self.shares_for(amount)?;
        let supplied = self
            .supplied
            .checked_add(amount)
            .ok_or(OracleError::Overflow("supplied underlying"))?;
        let shares = self
            .shares
            .checked_add(minted)
            .ok_or(OracleError::Overflow("venue shares"))?;
        token.transfer(self.address, self.venue(), amount)?;
        self.supplied = supplied;
        self.shares = shares;

        tracing::info!(deposit = %self.address, amount, minted, "supplied idle balance");
        Ok(amount)
    }

    /// Redeems `amount` of underlying and sends it to `to`; governor only.
    pub fn withdraw(&mut self, token: &mut TokenLedger, caller: Address, to: Address, amount: u128) -> Result<()> {
        if caller != self.governor {
            return Err(OracleError::Unauthorized {
                caller,
                action: "withdraw PCV",
            });
        }

        let available = self.supplied;
        if amount > available {
            return Err(OracleError::InsufficientBalance {
                account: self.address,
                available,
                required: amount,
            });
        }

        // Burned shares round up; redeeming everything supplied burns every share.
        let burned = if amount == available {
            self.shares
        } else {
            let mut burned = self.shares_for(amount)?;
            if self.underlying_for(burned)? < amount {
                burned += 1;
            }
            burned.min(self.shares)
        };
        token.transfer(self.venue(), to, amount)?;
        self.shares -= burned;
        self.supplied -= amount;

        tracing::info!(deposit = %self.address, %to, amount, "withdrew PCV");
        Ok(())
    }
}
