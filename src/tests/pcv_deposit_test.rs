//! Protocol-controlled value supplied to a lending venue.

use crate::pcv::PcvDeposit;
use crate::token::TokenLedger;
use crate::*;
use anyhow::Result;

/// Underlying per venue share, scaled by 1e18.
const EXCHANGE_RATE: u128 = 1_020_000_000_000_000_000;

fn funded_deposit(amount: u128) -> Result<(PcvDeposit, TokenLedger, Address)> {
    let governor = Address::from_label("feiDAOTimelock");
    let mut fei = TokenLedger::new("FEI");
    let pcv = PcvDeposit::new(Address::from_label("turboPCVDeposit"), governor, EXCHANGE_RATE);
    fei.mint(pcv.address, amount)?;
    Ok((pcv, fei, governor))
}

#[test]
fn test_deposit_supplies_idle_balance() -> Result<()> {
    println!("Testing PCV deposit...");
    let amount = 10_000_000 * ONE_TOKEN;
    let (mut pcv, mut fei, _) = funded_deposit(amount)?;

    assert_eq!(pcv.deposit(&mut fei)?, amount);
    assert_eq!(fei.balance_of(&pcv.address), 0);

    let balance = pcv.balance()?;
    println!("Deposited {}, venue reports {}", amount, balance);
    Tolerance::Absolute { max_diff: 100 }.check(balance, amount)?;
    assert!(balance <= amount);

    // Nothing idle, nothing supplied.
    assert_eq!(pcv.deposit(&mut fei)?, 0);

    println!("✅ PCV deposit test passed");
    Ok(())
}

#[test]
fn test_governor_withdraw_is_exact() -> Result<()> {
    println!("Testing PCV withdrawal...");
    let (mut pcv, mut fei, governor) = funded_deposit(10_000_000 * ONE_TOKEN)?;
    pcv.deposit(&mut fei)?;

    let recipient = Address::from_label("recipient");
    let withdrawal = 1_000_000 * ONE_TOKEN;
    let before = pcv.balance()?;

    pcv.withdraw(&mut fei, governor, recipient, withdrawal)?;
    assert_eq!(fei.balance_of(&recipient), withdrawal);
    Tolerance::Absolute { max_diff: 100 }.check(pcv.balance()?, before - withdrawal)?;

    let err = pcv.withdraw(&mut fei, recipient, recipient, withdrawal).unwrap_err();
    assert!(matches!(err, OracleError::Unauthorized { .. }));

    let err = pcv.withdraw(&mut fei, governor, recipient, 100_000_000 * ONE_TOKEN).unwrap_err();
    assert!(matches!(err, OracleError::InsufficientBalance { .. }));

    println!("✅ PCV withdrawal test passed");
    Ok(())
}

#[test]
fn test_deposit_then_withdraw_entire_amount() -> Result<()> {
    println!("Testing full PCV round trip...");
    let deposit_amount = 10_000_000 * ONE_TOKEN;
    let (mut pcv, mut fei, governor) = funded_deposit(deposit_amount)?;
    pcv.deposit(&mut fei)?;
    Tolerance::Absolute { max_diff: 100 }.check(pcv.balance()?, deposit_amount)?;

    let recipient = Address::from_label("recipient");
    pcv.withdraw(&mut fei, governor, recipient, deposit_amount)?;
    assert_eq!(fei.balance_of(&recipient), deposit_amount);
    assert_eq!(pcv.balance()?, 0);
    assert_eq!(pcv.supplied(), 0);

    println!("✅ Full PCV round trip test passed");
    Ok(())
}
