use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::amortization;
use super::domain::{Affiliate, ApplicationRequest, ApplicationStatus};

/// Gating thresholds applied before an application may be created. Injected
/// into the validator so tests can tighten or relax individual rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub min_affiliation_months: u32,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub min_term_months: u32,
    pub max_term_months: u32,
    pub max_purpose_length: usize,
    /// Salary multiplier backing the per-affiliate ceiling.
    pub salary_multiplier: Decimal,
    pub max_debt_to_income_ratio: Decimal,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            min_affiliation_months: 6,
            min_amount: dec!(1_000_000),
            max_amount: dec!(50_000_000),
            min_term_months: 6,
            max_term_months: 60,
            max_purpose_length: 500,
            salary_multiplier: dec!(10),
            max_debt_to_income_ratio: dec!(0.50),
        }
    }
}

/// A named business-rule violation. Every variant carries a stable string
/// code surfaced to callers alongside the rendered message; input can always
/// be corrected and resubmitted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleViolation {
    #[error("affiliation date is required to process credit applications")]
    AffiliationDateRequired,
    #[error("affiliate must have at least {required} months of affiliation; current: {actual} months")]
    InsufficientAffiliationTime { required: u32, actual: i64 },
    #[error("credit amount is required")]
    AmountRequired,
    #[error("minimum credit amount is ${minimum}")]
    AmountTooLow { minimum: Decimal },
    #[error("maximum credit amount is ${maximum}")]
    AmountTooHigh { maximum: Decimal },
    #[error("credit term is required")]
    TermRequired,
    #[error("minimum credit term is {minimum} months")]
    TermTooShort { minimum: u32 },
    #[error("maximum credit term is {maximum} months")]
    TermTooLong { maximum: u32 },
    #[error("purpose must not exceed {maximum} characters")]
    PurposeTooLong { maximum: usize },
    #[error("requested amount (${requested}) exceeds affiliate's maximum credit limit (${limit} based on salary)")]
    AmountExceedsAffiliateLimit { requested: Decimal, limit: Decimal },
    #[error("current debt must be zero or greater")]
    InvalidCurrentDebt,
    #[error("monthly income must be greater than zero")]
    InvalidMonthlyIncome,
    #[error("total debt-to-income ratio exceeds maximum allowed ({max_percent}%)")]
    DebtRatioExceeded { max_percent: Decimal },
    #[error("affiliate already has a pending credit application; wait for it to be processed")]
    PendingApplicationExists,
    #[error("application {id} is not pending evaluation; current status: {}", status.label())]
    InvalidApplicationStatus { id: i64, status: ApplicationStatus },
    #[error("failed to evaluate credit risk: {detail}")]
    RiskServiceError { detail: String },
}

impl RuleViolation {
    pub const fn code(&self) -> &'static str {
        match self {
            RuleViolation::AffiliationDateRequired => "AFFILIATION_DATE_REQUIRED",
            RuleViolation::InsufficientAffiliationTime { .. } => "INSUFFICIENT_AFFILIATION_TIME",
            RuleViolation::AmountRequired => "AMOUNT_REQUIRED",
            RuleViolation::AmountTooLow { .. } => "AMOUNT_TOO_LOW",
            RuleViolation::AmountTooHigh { .. } => "AMOUNT_TOO_HIGH",
            RuleViolation::TermRequired => "TERM_REQUIRED",
            RuleViolation::TermTooShort { .. } => "TERM_TOO_SHORT",
            RuleViolation::TermTooLong { .. } => "TERM_TOO_LONG",
            RuleViolation::PurposeTooLong { .. } => "PURPOSE_TOO_LONG",
            RuleViolation::AmountExceedsAffiliateLimit { .. } => "AMOUNT_EXCEEDS_AFFILIATE_LIMIT",
            RuleViolation::InvalidCurrentDebt => "INVALID_CURRENT_DEBT",
            RuleViolation::InvalidMonthlyIncome => "INVALID_MONTHLY_INCOME",
            RuleViolation::DebtRatioExceeded { .. } => "DEBT_RATIO_EXCEEDED",
            RuleViolation::PendingApplicationExists => "PENDING_APPLICATION_EXISTS",
            RuleViolation::InvalidApplicationStatus { .. } => "INVALID_APPLICATION_STATUS",
            RuleViolation::RiskServiceError { .. } => "RISK_SERVICE_ERROR",
        }
    }
}

/// Applies the gating business rules in a fixed order. The first failure
/// aborts a submission, so a request violating several rules reports the
/// earliest one: tenure, amount, term, purpose length, affiliate limit,
/// pending check, debt ratio.
#[derive(Debug, Clone, Default)]
pub struct EligibilityValidator {
    policy: EligibilityPolicy,
}

impl EligibilityValidator {
    pub fn new(policy: EligibilityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    pub fn validate_affiliation_time(
        &self,
        affiliate: &Affiliate,
        today: NaiveDate,
    ) -> Result<(), RuleViolation> {
        let months = affiliate
            .months_affiliated(today)
            .ok_or(RuleViolation::AffiliationDateRequired)?;

        if months < i64::from(self.policy.min_affiliation_months) {
            return Err(RuleViolation::InsufficientAffiliationTime {
                required: self.policy.min_affiliation_months,
                actual: months,
            });
        }
        Ok(())
    }

    pub fn validate_credit_amount(&self, amount: Option<Decimal>) -> Result<(), RuleViolation> {
        let amount = amount.ok_or(RuleViolation::AmountRequired)?;

        if amount < self.policy.min_amount {
            return Err(RuleViolation::AmountTooLow {
                minimum: self.policy.min_amount,
            });
        }
        if amount > self.policy.max_amount {
            return Err(RuleViolation::AmountTooHigh {
                maximum: self.policy.max_amount,
            });
        }
        Ok(())
    }

    pub fn validate_credit_term(&self, term_months: Option<u32>) -> Result<(), RuleViolation> {
        let term = term_months.ok_or(RuleViolation::TermRequired)?;

        if term < self.policy.min_term_months {
            return Err(RuleViolation::TermTooShort {
                minimum: self.policy.min_term_months,
            });
        }
        if term > self.policy.max_term_months {
            return Err(RuleViolation::TermTooLong {
                maximum: self.policy.max_term_months,
            });
        }
        Ok(())
    }

    pub fn validate_purpose(&self, purpose: &str) -> Result<(), RuleViolation> {
        if purpose.chars().count() > self.policy.max_purpose_length {
            return Err(RuleViolation::PurposeTooLong {
                maximum: self.policy.max_purpose_length,
            });
        }
        Ok(())
    }

    /// Re-checks tenure and standing, then holds the requested amount to the
    /// salary-based ceiling. An inactive affiliate fails the tenure gate here
    /// just as one without enough months does.
    pub fn validate_affiliate_limit(
        &self,
        affiliate: &Affiliate,
        requested_amount: Decimal,
        today: NaiveDate,
    ) -> Result<(), RuleViolation> {
        if !affiliate.can_request_credit(self.policy.min_affiliation_months, today) {
            return Err(RuleViolation::InsufficientAffiliationTime {
                required: self.policy.min_affiliation_months,
                actual: affiliate.months_affiliated(today).unwrap_or(0),
            });
        }

        let limit = affiliate.max_credit_amount(self.policy.salary_multiplier);
        if requested_amount > limit {
            return Err(RuleViolation::AmountExceedsAffiliateLimit {
                requested: requested_amount,
                limit,
            });
        }
        Ok(())
    }

    /// Validates debt inputs, then checks the amortized payment-to-income
    /// ratio against the policy ceiling. Current debt is a precondition only;
    /// it is not folded into the ratio.
    pub fn validate_debt_ratio(
        &self,
        requested_amount: Decimal,
        interest_rate: Decimal,
        term_months: u32,
        monthly_income: Option<Decimal>,
        current_debt: Option<Decimal>,
    ) -> Result<(), RuleViolation> {
        match current_debt {
            Some(debt) if debt >= Decimal::ZERO => {}
            _ => return Err(RuleViolation::InvalidCurrentDebt),
        }

        let income = match monthly_income {
            Some(income) if income > Decimal::ZERO => income,
            _ => return Err(RuleViolation::InvalidMonthlyIncome),
        };

        if amortization::exceeds_ratio(
            requested_amount,
            interest_rate,
            term_months,
            income,
            self.policy.max_debt_to_income_ratio,
        ) {
            return Err(RuleViolation::DebtRatioExceeded {
                max_percent: (self.policy.max_debt_to_income_ratio * dec!(100)).normalize(),
            });
        }
        Ok(())
    }

    pub fn validate_no_pending_applications(&self, has_pending: bool) -> Result<(), RuleViolation> {
        if has_pending {
            return Err(RuleViolation::PendingApplicationExists);
        }
        Ok(())
    }

    /// Full submission gate, in contract order. The fixed ordering is itself
    /// part of the API: callers see the first violated rule only.
    pub fn validate_submission(
        &self,
        affiliate: &Affiliate,
        request: &ApplicationRequest,
        has_pending: bool,
        today: NaiveDate,
    ) -> Result<(), RuleViolation> {
        self.validate_affiliation_time(affiliate, today)?;
        self.validate_credit_amount(request.requested_amount)?;
        self.validate_credit_term(request.term_months)?;
        self.validate_purpose(&request.purpose)?;

        // Amount and term are present past this point.
        let amount = request.requested_amount.unwrap_or_default();
        let term = request.term_months.unwrap_or_default();

        self.validate_affiliate_limit(affiliate, amount, today)?;
        self.validate_no_pending_applications(has_pending)?;
        self.validate_debt_ratio(
            amount,
            request.interest_rate,
            term,
            request.monthly_income,
            request.current_debt,
        )?;
        Ok(())
    }
}
