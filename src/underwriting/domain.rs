use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for cooperative members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffiliateId(pub i64);

/// Identifier wrapper for credit applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub i64);

/// Membership standing of an affiliate. Affiliates are never deleted; they are
/// moved to `Inactive` or `Suspended` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffiliateStatus {
    Active,
    Inactive,
    Suspended,
}

/// A cooperative member eligible to request credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affiliate {
    pub id: AffiliateId,
    pub document_type: String,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub salary: Decimal,
    /// Absent on legacy records migrated without a start date; eligibility
    /// rejects those outright.
    pub affiliation_date: Option<NaiveDate>,
    pub status: AffiliateStatus,
}

impl Affiliate {
    pub fn is_active(&self) -> bool {
        self.status == AffiliateStatus::Active
    }

    /// Whole months elapsed since affiliation, truncated. Returns `None` when
    /// no affiliation date is on record.
    pub fn months_affiliated(&self, today: NaiveDate) -> Option<i64> {
        self.affiliation_date
            .map(|start| whole_months_between(start, today))
    }

    /// Salary-based credit ceiling: `salary × multiplier`.
    pub fn max_credit_amount(&self, multiplier: Decimal) -> Decimal {
        self.salary * multiplier
    }

    /// An affiliate may borrow only while active and past the minimum tenure.
    pub fn can_request_credit(&self, min_months: u32, today: NaiveDate) -> bool {
        self.is_active()
            && self
                .months_affiliated(today)
                .is_some_and(|months| months >= i64::from(min_months))
    }
}

/// Whole calendar months from `start` to `end`, truncated toward zero.
fn whole_months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let mut months = i64::from(end.year() - start.year()) * 12
        + i64::from(end.month() as i32 - start.month() as i32);
    if months > 0 && end.day() < start.day() {
        months -= 1;
    }
    months
}

/// Inbound credit request as supplied by the caller. Fields the engine must
/// report as missing stay optional here; everything is re-validated before an
/// application is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub requested_amount: Option<Decimal>,
    pub term_months: Option<u32>,
    /// Annual interest rate as a percentage (e.g. 12.5 for 12.5%).
    pub interest_rate: Decimal,
    pub monthly_income: Option<Decimal>,
    pub current_debt: Option<Decimal>,
    #[serde(default)]
    pub purpose: String,
}

/// Lifecycle of a credit application.
///
/// `Pending` is the only state the automatic evaluation path accepts.
/// `InReview` can still be closed out by an analyst through the manual
/// approve/reject operations, which carry no precondition on current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    InReview,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::InReview => "IN_REVIEW",
        }
    }
}

/// Score band descriptor derived from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn from_score(score: i32) -> Self {
        if score >= 700 {
            RiskLevel::Low
        } else if score >= 500 {
            RiskLevel::Medium
        } else if score >= 300 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::VeryHigh => "VERY_HIGH",
        }
    }
}

/// The scorer's suggested outcome, distinct from the application's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Approve,
    ManualReview,
    Reject,
}

impl Recommendation {
    pub fn from_score(score: i32) -> Self {
        if score >= 700 {
            Recommendation::Approve
        } else if score >= 300 {
            Recommendation::ManualReview
        } else {
            Recommendation::Reject
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::Approve => "APPROVE",
            Recommendation::ManualReview => "MANUAL_REVIEW",
            Recommendation::Reject => "REJECT",
        }
    }
}

/// Result of one risk evaluation. Created once per application and immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: i32,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
    /// One human-readable factor per scoring dimension, in scoring order:
    /// debt ratio, income, loan amount, term.
    pub risk_factors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
}

impl RiskAssessment {
    pub fn comments(&self) -> String {
        format!(
            "Credit Score: {} | Risk Level: {} | Recommendation: {} | Factors: {}",
            self.score,
            self.risk_level.label(),
            self.recommendation.label(),
            if self.risk_factors.is_empty() {
                "None".to_string()
            } else {
                self.risk_factors.join(", ")
            }
        )
    }
}

/// Score at or above which an evaluated application auto-approves.
pub const AUTO_APPROVE_SCORE: i32 = 700;
/// Score below which an evaluated application auto-rejects.
pub const AUTO_REJECT_BELOW: i32 = 400;

/// A credit request owned by exactly one affiliate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditApplication {
    pub id: ApplicationId,
    pub affiliate_id: AffiliateId,
    pub requested_amount: Decimal,
    pub term_months: u32,
    /// Annual interest rate as a percentage.
    pub interest_rate: Decimal,
    pub monthly_income: Decimal,
    pub current_debt: Decimal,
    pub purpose: String,
    pub status: ApplicationStatus,
    pub application_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<RiskAssessment>,
}

impl CreditApplication {
    /// Build a freshly submitted application in `Pending` status.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ApplicationId,
        affiliate_id: AffiliateId,
        requested_amount: Decimal,
        term_months: u32,
        interest_rate: Decimal,
        monthly_income: Decimal,
        current_debt: Decimal,
        purpose: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            affiliate_id,
            requested_amount,
            term_months,
            interest_rate,
            monthly_income,
            current_debt,
            purpose,
            status: ApplicationStatus::Pending,
            application_date: now,
            evaluation_date: None,
            evaluation_comments: None,
            evaluation: None,
        }
    }

    /// Attach a risk assessment and move the status accordingly.
    ///
    /// Caller contract: the application is `Pending`. The orchestrator guards
    /// this with `INVALID_APPLICATION_STATUS` before calling.
    pub fn apply_assessment(&mut self, assessment: RiskAssessment, now: DateTime<Utc>) {
        self.evaluation_date = Some(now);
        self.evaluation_comments = Some(assessment.comments());

        self.status = if assessment.score >= AUTO_APPROVE_SCORE {
            ApplicationStatus::Approved
        } else if assessment.score < AUTO_REJECT_BELOW {
            ApplicationStatus::Rejected
        } else {
            ApplicationStatus::InReview
        };

        self.evaluation = Some(assessment);
    }

    /// Analyst override: force approval regardless of current status.
    pub fn approve(&mut self) {
        self.status = ApplicationStatus::Approved;
    }

    /// Analyst override: force rejection regardless of current status.
    pub fn reject(&mut self) {
        self.status = ApplicationStatus::Rejected;
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }
}
