use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use unify_core::precision::{
    amount_to_precision, cost_to_precision, parse_precision, price_to_precision, round_to_step,
};
use unify_core::{ErrorKind, Rounding};

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn rounds_price_half_away_from_zero() {
    assert_eq!(price_to_precision(d("1.005"), d("0.01")).unwrap(), d("1.01"));
    assert_eq!(price_to_precision(d("1.0049"), d("0.01")).unwrap(), d("1.00"));
    assert_eq!(price_to_precision(d("49297.73"), d("0.5")).unwrap(), d("49297.5"));
}

#[test]
fn truncates_amounts() {
    assert_eq!(amount_to_precision(d("0.123456789"), d("0.0001")).unwrap(), d("0.1234"));
    assert_eq!(amount_to_precision(d("7.99"), d("1")).unwrap(), d("7"));
}

#[test]
fn cost_truncates_onto_grid() {
    assert_eq!(cost_to_precision(d("99.996"), d("0.01")).unwrap(), d("99.99"));
    assert_eq!(cost_to_precision(d("15000"), d("0.01")).unwrap(), d("15000"));
}

#[test]
fn non_positive_step_is_bad_request() {
    let err = round_to_step(d("1"), Decimal::ZERO, Rounding::Round).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert!(round_to_step(d("1"), d("-0.1"), Rounding::Truncate).is_err());
}

#[test]
fn digit_counts_become_increments() {
    assert_eq!(parse_precision("4"), Some(d("0.0001")));
    assert_eq!(parse_precision("0"), Some(d("1")));
    assert_eq!(parse_precision("-2"), Some(d("100")));
    assert_eq!(parse_precision("2.0"), Some(d("0.01")));
    assert_eq!(parse_precision("abc"), None);
    assert_eq!(parse_precision("2.5"), None);
}

fn step_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (0u32..10).prop_map(|s| Decimal::new(1, s)),
        (1i64..100, 0u32..6).prop_map(|(m, s)| Decimal::new(m, s)),
    ]
}

proptest! {
    #[test]
    fn price_rounding_is_idempotent(mantissa in -10_000_000_000i64..10_000_000_000i64, scale in 0u32..10, step in step_strategy()) {
        let price = Decimal::new(mantissa, scale);
        let once = price_to_precision(price, step).unwrap();
        let twice = price_to_precision(once, step).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn truncation_never_exceeds_input(mantissa in 0i64..10_000_000_000i64, scale in 0u32..10, step in step_strategy()) {
        let amount = Decimal::new(mantissa, scale);
        let out = amount_to_precision(amount, step).unwrap();
        prop_assert!(out <= amount);
        prop_assert!(amount - out < step);
        prop_assert_eq!(amount_to_precision(out, step).unwrap(), out);
    }
}
