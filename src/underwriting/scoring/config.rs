use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Tier thresholds for the deterministic scoring rules. Defaults carry the
/// production values; tests inject alternates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Debt-ratio tiers: at or under `excellent` earns the full bonus, under
    /// `good` a partial one, under `acceptable` nothing, above it the penalty.
    pub excellent_debt_ratio: Decimal,
    pub good_debt_ratio: Decimal,
    pub acceptable_debt_ratio: Decimal,
    /// Monthly income tiers.
    pub medium_income_threshold: Decimal,
    pub high_income_threshold: Decimal,
    /// Loan-to-annual-income tiers.
    pub conservative_loan_ratio: Decimal,
    pub moderate_loan_ratio: Decimal,
    /// Term tiers in months.
    pub short_term_months: u32,
    pub medium_term_months: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            excellent_debt_ratio: dec!(0.20),
            good_debt_ratio: dec!(0.35),
            acceptable_debt_ratio: dec!(0.50),
            medium_income_threshold: dec!(2_000_000),
            high_income_threshold: dec!(5_000_000),
            conservative_loan_ratio: dec!(2),
            moderate_loan_ratio: dec!(4),
            short_term_months: 12,
            medium_term_months: 36,
        }
    }
}
