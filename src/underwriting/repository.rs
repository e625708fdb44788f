use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{Affiliate, AffiliateId, ApplicationId, CreditApplication, RiskAssessment};

/// Storage abstraction over the affiliate/application aggregates. The service
/// assumes these operations observe a consistent snapshot; serializing
/// concurrent submissions per affiliate is the adapter's responsibility.
pub trait UnderwritingRepository: Send + Sync {
    fn affiliate(&self, id: AffiliateId) -> Result<Option<Affiliate>, RepositoryError>;
    fn insert_application(
        &self,
        application: CreditApplication,
    ) -> Result<CreditApplication, RepositoryError>;
    fn update_application(&self, application: CreditApplication) -> Result<(), RepositoryError>;
    fn application(&self, id: ApplicationId)
        -> Result<Option<CreditApplication>, RepositoryError>;
    fn applications_for_affiliate(
        &self,
        id: AffiliateId,
    ) -> Result<Vec<CreditApplication>, RepositoryError>;
    fn has_pending_application(&self, id: AffiliateId) -> Result<bool, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Wire shape consumed by a scoring provider, in-process or remote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRequest {
    pub document_number: String,
    pub requested_amount: Decimal,
    pub monthly_income: Decimal,
    pub current_debt: Decimal,
    pub term_months: u32,
}

/// Boundary to the risk-scoring collaborator. A remote implementation runs the
/// identical deterministic algorithm; any transport failure surfaces as
/// `Unavailable` and is translated to the `RISK_SERVICE_ERROR` business code
/// by the orchestrator.
pub trait ScoringProvider: Send + Sync {
    fn evaluate(&self, request: &RiskRequest) -> Result<RiskAssessment, ScoringProviderError>;
}

/// Scoring transport error.
#[derive(Debug, thiserror::Error)]
pub enum ScoringProviderError {
    #[error("risk scoring service unavailable: {0}")]
    Unavailable(String),
}
