use rust_decimal_macros::dec;

use crate::underwriting::amortization::{debt_to_income_ratio, exceeds_ratio, monthly_payment};

#[test]
fn zero_rate_payment_is_straight_division() {
    let payment = monthly_payment(dec!(12_000_000), dec!(0), 24);
    assert_eq!(payment, dec!(500_000.00));
}

#[test]
fn zero_rate_payment_rounds_half_up() {
    // 10,000,000 / 24 = 416,666.666... -> 416,666.67
    let payment = monthly_payment(dec!(10_000_000), dec!(0), 24);
    assert_eq!(payment, dec!(416_666.67));
}

#[test]
fn payment_increases_with_rate() {
    let principal = dec!(10_000_000);
    let mut previous = monthly_payment(principal, dec!(0), 36);
    for rate in [dec!(5), dec!(10), dec!(15), dec!(20), dec!(25)] {
        let payment = monthly_payment(principal, rate, 36);
        assert!(
            payment > previous,
            "payment at rate {rate} ({payment}) should exceed {previous}"
        );
        previous = payment;
    }
}

#[test]
fn positive_rate_payment_matches_known_schedule() {
    // 12% annual over 12 months: monthly rate 1%, standard annuity factor.
    let payment = monthly_payment(dec!(1_000_000), dec!(12), 12);
    assert_eq!(payment, dec!(88_848.79));
}

#[test]
fn zero_income_ratio_defaults_to_one() {
    assert_eq!(debt_to_income_ratio(dec!(500_000), dec!(0)), dec!(1));
}

#[test]
fn ratio_rounds_to_four_places() {
    // 416,666.67 / 5,000,000 = 0.083333334 -> 0.0833
    let ratio = debt_to_income_ratio(dec!(416_666.67), dec!(5_000_000));
    assert_eq!(ratio, dec!(0.0833));
}

#[test]
fn exceeds_ratio_uses_payment_to_income_only() {
    // Payment on 10M at 0% over 24 months is 416,666.67, a 41.67% ratio on
    // 1M income: above a 40% ceiling, below 50%.
    assert!(exceeds_ratio(
        dec!(10_000_000),
        dec!(0),
        24,
        dec!(1_000_000),
        dec!(0.40)
    ));
    assert!(!exceeds_ratio(
        dec!(10_000_000),
        dec!(0),
        24,
        dec!(1_000_000),
        dec!(0.50)
    ));
}
