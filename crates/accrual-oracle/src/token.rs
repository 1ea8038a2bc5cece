use crate::error::{OracleError, Result};
use crate::types::Address;
use std::collections::HashMap;

/// In-memory fungible token balances.
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    pub symbol: String,
    balances: HashMap<Address, u128>,
    total_supply: u128,
}

impl TokenLedger {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Self::default()
        }
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn mint(&mut self, to: Address, amount: u128) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(OracleError::Overflow("token supply"))?;
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<()> {
        let available = self.balance_of(&from);
        if available < amount {
            return Err(OracleError::InsufficientBalance {
                account: from,
                available,
                required: amount,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }

        self.balances.insert(from, available - amount);
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_transfer() {
        let alice = Address::from_label("alice");
        let bob = Address::from_label("bob");
        let mut token = TokenLedger::new("TRIBE");

        token.mint(alice, 100).unwrap();
        token.transfer(alice, bob, 40).unwrap();

        assert_eq!(token.balance_of(&alice), 60);
        assert_eq!(token.balance_of(&bob), 40);
        assert_eq!(token.total_supply(), 100);
    }

    #[test]
    fn test_transfer_more_than_balance_fails() {
        let alice = Address::from_label("alice");
        let mut token = TokenLedger::new("TRIBE");
        token.mint(alice, 10).unwrap();

        let err = token.transfer(alice, Address::ZERO, 11).unwrap_err();
        assert!(matches!(err, OracleError::InsufficientBalance { available: 10, required: 11, .. }));
    }
}
