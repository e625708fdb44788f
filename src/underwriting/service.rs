use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{
    Affiliate, AffiliateId, ApplicationId, ApplicationRequest, CreditApplication,
};
use super::eligibility::{EligibilityPolicy, EligibilityValidator, RuleViolation};
use super::repository::{RepositoryError, RiskRequest, ScoringProvider, UnderwritingRepository};

static APPLICATION_SEQUENCE: AtomicI64 = AtomicI64::new(1);

fn next_application_id() -> ApplicationId {
    ApplicationId(APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Orchestrates the underwriting pipeline: eligibility gating on submission,
/// risk scoring plus the status transition on evaluation, and the manual
/// analyst overrides.
pub struct UnderwritingService<R, S> {
    repository: Arc<R>,
    scorer: Arc<S>,
    validator: EligibilityValidator,
}

/// Error surface of the underwriting operations. Business-rule violations are
/// recoverable by correcting input; not-found is always a client problem.
#[derive(Debug, thiserror::Error)]
pub enum UnderwritingError {
    #[error(transparent)]
    Rule(#[from] RuleViolation),
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl UnderwritingError {
    fn affiliate_not_found(id: AffiliateId) -> Self {
        Self::NotFound {
            resource: "affiliate",
            id: id.0,
        }
    }

    fn application_not_found(id: ApplicationId) -> Self {
        Self::NotFound {
            resource: "application",
            id: id.0,
        }
    }
}

impl<R, S> UnderwritingService<R, S>
where
    R: UnderwritingRepository + 'static,
    S: ScoringProvider + 'static,
{
    pub fn new(repository: Arc<R>, scorer: Arc<S>, policy: EligibilityPolicy) -> Self {
        Self {
            repository,
            scorer,
            validator: EligibilityValidator::new(policy),
        }
    }

    /// Submit a credit request for an affiliate. Runs the fixed-order
    /// eligibility gate and creates the application in `Pending`.
    pub fn submit(
        &self,
        affiliate_id: AffiliateId,
        request: ApplicationRequest,
    ) -> Result<CreditApplication, UnderwritingError> {
        info!(affiliate = affiliate_id.0, "submitting credit application");

        let affiliate = self.load_affiliate(affiliate_id)?;
        let has_pending = self.repository.has_pending_application(affiliate_id)?;
        let today = Utc::now().date_naive();

        self.validator
            .validate_submission(&affiliate, &request, has_pending, today)?;

        // Validation guarantees amount, term, income, and debt are present.
        let application = CreditApplication::new(
            next_application_id(),
            affiliate_id,
            request.requested_amount.unwrap_or_default(),
            request.term_months.unwrap_or_default(),
            request.interest_rate,
            request.monthly_income.unwrap_or_default(),
            request.current_debt.unwrap_or_default(),
            request.purpose,
            Utc::now(),
        );

        let stored = self.repository.insert_application(application)?;
        info!(
            application = stored.id.0,
            affiliate = affiliate_id.0,
            "credit application created"
        );
        Ok(stored)
    }

    /// Evaluate a pending application through the scoring provider and apply
    /// the resulting status transition. Re-evaluating a non-pending
    /// application fails instead of re-scoring.
    pub fn evaluate(&self, id: ApplicationId) -> Result<CreditApplication, UnderwritingError> {
        let mut application = self.load_application(id)?;

        if !application.is_pending() {
            return Err(RuleViolation::InvalidApplicationStatus {
                id: id.0,
                status: application.status,
            }
            .into());
        }

        let affiliate = self.load_affiliate(application.affiliate_id)?;
        let risk_request = RiskRequest {
            document_number: affiliate.document_number.clone(),
            requested_amount: application.requested_amount,
            monthly_income: application.monthly_income,
            current_debt: application.current_debt,
            term_months: application.term_months,
        };

        debug!(
            application = id.0,
            amount = %application.requested_amount,
            term = application.term_months,
            "requesting risk assessment"
        );

        let assessment = self.scorer.evaluate(&risk_request).map_err(|err| {
            warn!(application = id.0, error = %err, "risk scoring call failed");
            RuleViolation::RiskServiceError {
                detail: err.to_string(),
            }
        })?;

        application.apply_assessment(assessment, Utc::now());
        self.repository.update_application(application.clone())?;

        info!(
            application = id.0,
            status = application.status.label(),
            score = application.evaluation.as_ref().map(|e| e.score),
            "credit application evaluated"
        );
        Ok(application)
    }

    /// Analyst override: force approval. No precondition on current status.
    pub fn approve(&self, id: ApplicationId) -> Result<CreditApplication, UnderwritingError> {
        self.override_status(id, CreditApplication::approve, "approved")
    }

    /// Analyst override: force rejection. No precondition on current status.
    pub fn reject(&self, id: ApplicationId) -> Result<CreditApplication, UnderwritingError> {
        self.override_status(id, CreditApplication::reject, "rejected")
    }

    pub fn get(&self, id: ApplicationId) -> Result<CreditApplication, UnderwritingError> {
        self.load_application(id)
    }

    pub fn applications_for_affiliate(
        &self,
        id: AffiliateId,
    ) -> Result<Vec<CreditApplication>, UnderwritingError> {
        // Confirm the affiliate exists so callers get a 404 rather than [].
        self.load_affiliate(id)?;
        Ok(self.repository.applications_for_affiliate(id)?)
    }

    fn override_status(
        &self,
        id: ApplicationId,
        transition: fn(&mut CreditApplication),
        action: &'static str,
    ) -> Result<CreditApplication, UnderwritingError> {
        let mut application = self.load_application(id)?;
        transition(&mut application);
        self.repository.update_application(application.clone())?;
        info!(application = id.0, action, "manual decision recorded");
        Ok(application)
    }

    fn load_affiliate(&self, id: AffiliateId) -> Result<Affiliate, UnderwritingError> {
        self.repository
            .affiliate(id)?
            .ok_or_else(|| UnderwritingError::affiliate_not_found(id))
    }

    fn load_application(&self, id: ApplicationId) -> Result<CreditApplication, UnderwritingError> {
        self.repository
            .application(id)?
            .ok_or_else(|| UnderwritingError::application_not_found(id))
    }
}
