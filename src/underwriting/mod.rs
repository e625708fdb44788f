//! Credit underwriting engine: eligibility gating, amortization math,
//! deterministic risk scoring, and the application status machine, composed
//! behind a service facade and a thin HTTP router.

pub mod amortization;
pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Affiliate, AffiliateId, AffiliateStatus, ApplicationId, ApplicationRequest, ApplicationStatus,
    CreditApplication, Recommendation, RiskAssessment, RiskLevel,
};
pub use eligibility::{EligibilityPolicy, EligibilityValidator, RuleViolation};
pub use repository::{
    RepositoryError, RiskRequest, ScoringProvider, ScoringProviderError, UnderwritingRepository,
};
pub use router::underwriting_router;
pub use scoring::{RiskScorer, ScoringConfig};
pub use service::{UnderwritingError, UnderwritingService};
