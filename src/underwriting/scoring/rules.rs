//! Per-dimension scoring rules. Each rule returns its point contribution and
//! exactly one descriptive factor string, whichever branch fires, so the
//! factor list always lines up one-per-dimension.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use sha2::{Digest, Sha256};

use super::config::ScoringConfig;

/// Neutral base used when no document number is supplied.
const DEFAULT_BASE_SCORE: i32 = 500;
const BASE_SCORE_FLOOR: i32 = 400;
const BASE_SCORE_SPAN: u64 = 201;

/// Deterministic base score in [400, 600] derived from the document number.
///
/// The same document always hashes to the same base, which keeps repeat
/// evaluations reproducible for audits.
pub(crate) fn base_score(document_number: &str) -> i32 {
    if document_number.is_empty() {
        return DEFAULT_BASE_SCORE;
    }

    let digest = Sha256::digest(document_number.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let hash = u64::from_be_bytes(prefix);

    BASE_SCORE_FLOOR + (hash % BASE_SCORE_SPAN) as i32
}

/// Debt-ratio dimension (weight 40% = ±200 points).
///
/// Uses the simplified payment `principal / term` with no interest; risk
/// scoring intentionally diverges from the amortized eligibility formula here.
/// Current debt IS folded into this ratio, unlike the eligibility gate.
pub(crate) fn debt_ratio_score(
    requested_amount: Decimal,
    term_months: u32,
    current_debt: Decimal,
    monthly_income: Decimal,
    config: &ScoringConfig,
) -> (i32, String) {
    let simplified_payment = (requested_amount / Decimal::from(term_months))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total_monthly_debt = current_debt + simplified_payment;
    let ratio = (total_monthly_debt / monthly_income)
        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);

    if ratio <= config.excellent_debt_ratio {
        (200, "Excellent debt-to-income ratio".to_string())
    } else if ratio <= config.good_debt_ratio {
        (100, "Good debt-to-income ratio".to_string())
    } else if ratio <= config.acceptable_debt_ratio {
        (0, "Acceptable debt-to-income ratio".to_string())
    } else {
        let percent = (ratio * dec!(100)).trunc().to_i32().unwrap_or(i32::MAX);
        (-200, format!("High debt-to-income ratio: {percent}%"))
    }
}

/// Income dimension (weight 25% = ±125 points).
pub(crate) fn income_score(monthly_income: Decimal, config: &ScoringConfig) -> (i32, String) {
    if monthly_income >= config.high_income_threshold {
        (125, "High income level".to_string())
    } else if monthly_income >= config.medium_income_threshold {
        (50, "Medium income level".to_string())
    } else {
        (-75, "Low income level".to_string())
    }
}

/// Loan-amount dimension (weight 20% = ±100 points), keyed on the ratio of
/// the requested amount to annual income.
pub(crate) fn loan_amount_score(
    requested_amount: Decimal,
    monthly_income: Decimal,
    config: &ScoringConfig,
) -> (i32, String) {
    let annual_income = monthly_income * dec!(12);
    let loan_to_income = (requested_amount / annual_income)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    if loan_to_income <= config.conservative_loan_ratio {
        (100, "Conservative loan amount".to_string())
    } else if loan_to_income <= config.moderate_loan_ratio {
        (0, "Moderate loan amount".to_string())
    } else {
        (-100, "High loan amount relative to annual income".to_string())
    }
}

/// Term dimension (weight 15% = ±75 points).
pub(crate) fn term_score(term_months: u32, config: &ScoringConfig) -> (i32, String) {
    if term_months <= config.short_term_months {
        (75, "Short-term loan (lower risk)".to_string())
    } else if term_months <= config.medium_term_months {
        (25, "Medium-term loan".to_string())
    } else {
        (-50, "Long-term loan (higher risk)".to_string())
    }
}
