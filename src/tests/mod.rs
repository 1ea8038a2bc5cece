pub mod pcv_deposit_test;

#[cfg(test)]
mod oracle_tests {
    use crate::*;

    const TRIBE_PER_BLOCK: u128 = 26_150_000_000_000_000_000;

    #[test]
    fn test_reference_prediction() {
        let delta = predict_pending_delta(10, TRIBE_PER_BLOCK, 1000, 2000).unwrap();
        assert_eq!(delta, 130_750_000_000_000_000_000);
    }

    #[test]
    fn test_zero_total_alloc_is_rejected() {
        assert_eq!(
            predict_pending_delta(10, TRIBE_PER_BLOCK, 1000, 0),
            Err(OracleError::DivisionByZero)
        );
    }

    #[test]
    fn test_default_tolerance_band() {
        let tolerance = Tolerance::default();
        assert_eq!(tolerance.allowed(130_750_000_000_000_000_000), 130_750_000_000_000_000);
        assert!(tolerance.is_within(130_750_000_000_000_000_001, 130_750_000_000_000_000_000));
        assert!(!tolerance.is_within(2 * TRIBE_PER_BLOCK, TRIBE_PER_BLOCK));
    }

    #[test]
    fn test_config_loads_tolerance_from_json() {
        // Wider than u64.
        let json = format!(
            r#"{{ "tolerance": {{ "absolute": {{ "max_diff": {} }} }}, "block_time_secs": 12 }}"#,
            TRIBE_PER_BLOCK
        );
        let config = OracleConfig::from_json(&json).unwrap();
        assert_eq!(config.block_time_secs, 12);
        assert_eq!(config.tolerance, Tolerance::Absolute { max_diff: TRIBE_PER_BLOCK });
        assert!(config.tolerance.is_within(2 * TRIBE_PER_BLOCK, TRIBE_PER_BLOCK));

        let config = OracleConfig::from_json(r#"{ "tolerance": { "relative": { "bps": 25, "floor": 0 } } }"#).unwrap();
        assert_eq!(config.tolerance, Tolerance::Relative { bps: 25, floor: 0 });

        let config = OracleConfig::from_json(r#"{ "tolerance": "exact" }"#).unwrap();
        assert_eq!(config.tolerance, Tolerance::Exact);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let config = OracleConfig::default();
        init_logging(&config);
        assert!(!init_logging(&config), "a second subscriber must not be installed");
    }

    #[test]
    fn test_constants() {
        assert_eq!(ONE_TOKEN, 1_000_000_000_000_000_000);
        assert_eq!(ACC_REWARD_PRECISION, 100_000 * ONE_TOKEN);
        assert_eq!(BASIS_POINTS, 10000);
    }
}
