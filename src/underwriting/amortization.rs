//! Fixed-payment amortization math shared by eligibility gating and reporting.
//!
//! All money values are `rust_decimal::Decimal`; rounding is half-up
//! (`MidpointAwayFromZero`, equivalent for the positive amounts handled here).

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Fixed monthly payment for `principal` at `annual_rate_percent` over
/// `term_months`, rounded to 2 decimal places.
///
/// A zero rate degenerates to straight division. `term_months` must be
/// positive; passing zero is a programming error, not a business error.
pub fn monthly_payment(principal: Decimal, annual_rate_percent: Decimal, term_months: u32) -> Decimal {
    debug_assert!(term_months > 0, "term_months must be positive");

    let term = Decimal::from(term_months);
    let monthly_rate = annual_rate_percent / MONTHS_PER_YEAR / PERCENT;

    let payment = if monthly_rate.is_zero() {
        principal / term
    } else {
        let growth = (Decimal::ONE + monthly_rate).powi(i64::from(term_months));
        principal * monthly_rate * growth / (growth - Decimal::ONE)
    };

    payment.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Payment-to-income ratio rounded to 4 decimal places.
///
/// Zero income returns `1.0` (a 100% ratio) as a safety default instead of
/// dividing by zero.
pub fn debt_to_income_ratio(monthly_payment: Decimal, monthly_income: Decimal) -> Decimal {
    if monthly_income.is_zero() {
        return Decimal::ONE;
    }
    (monthly_payment / monthly_income)
        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether the amortized payment for this loan exceeds `max_ratio` of income.
///
/// The ratio is payment-to-income only; current debt is validated as a
/// separate precondition and is deliberately not folded in here.
pub fn exceeds_ratio(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
    monthly_income: Decimal,
    max_ratio: Decimal,
) -> bool {
    let payment = monthly_payment(principal, annual_rate_percent, term_months);
    debt_to_income_ratio(payment, monthly_income) > max_ratio
}
