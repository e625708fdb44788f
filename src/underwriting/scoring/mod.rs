//! Deterministic risk scoring.
//!
//! Identical inputs always yield an identical assessment; the only
//! pseudo-random ingredient is a stable hash of the applicant's document
//! number. That property is what makes evaluations auditable and testable.

mod config;
pub(crate) mod rules;

pub use config::ScoringConfig;

use tracing::debug;

use super::domain::{Recommendation, RiskAssessment, RiskLevel};
use super::repository::{RiskRequest, ScoringProvider, ScoringProviderError};

const MIN_SCORE: i32 = 0;
const MAX_SCORE: i32 = 1000;

/// In-process scoring provider applying the tiered rubric.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score a request into a full assessment. Factors accumulate in rule
    /// order: debt ratio, income, loan amount, term.
    pub fn assess(&self, request: &RiskRequest) -> RiskAssessment {
        let base = rules::base_score(&request.document_number);

        let (debt_points, debt_factor) = rules::debt_ratio_score(
            request.requested_amount,
            request.term_months,
            request.current_debt,
            request.monthly_income,
            &self.config,
        );
        let (income_points, income_factor) =
            rules::income_score(request.monthly_income, &self.config);
        let (loan_points, loan_factor) =
            rules::loan_amount_score(request.requested_amount, request.monthly_income, &self.config);
        let (term_points, term_factor) = rules::term_score(request.term_months, &self.config);

        debug!(
            base,
            debt_points, income_points, loan_points, term_points, "score contributions"
        );

        let score = (base + debt_points + income_points + loan_points + term_points)
            .clamp(MIN_SCORE, MAX_SCORE);

        RiskAssessment {
            score,
            risk_level: RiskLevel::from_score(score),
            recommendation: Recommendation::from_score(score),
            risk_factors: vec![debt_factor, income_factor, loan_factor, term_factor],
            external_reference: None,
        }
    }
}

impl ScoringProvider for RiskScorer {
    fn evaluate(&self, request: &RiskRequest) -> Result<RiskAssessment, ScoringProviderError> {
        Ok(self.assess(request))
    }
}
