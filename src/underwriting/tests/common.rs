use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::underwriting::domain::{
    Affiliate, AffiliateId, AffiliateStatus, ApplicationId, ApplicationRequest, ApplicationStatus,
    CreditApplication, Recommendation, RiskAssessment, RiskLevel,
};
use crate::underwriting::eligibility::{EligibilityPolicy, EligibilityValidator};
use crate::underwriting::repository::{
    RepositoryError, RiskRequest, ScoringProvider, ScoringProviderError, UnderwritingRepository,
};
use crate::underwriting::scoring::RiskScorer;
use crate::underwriting::service::UnderwritingService;

pub(super) const AFFILIATE_ID: AffiliateId = AffiliateId(42);

pub(super) fn affiliate() -> Affiliate {
    Affiliate {
        id: AFFILIATE_ID,
        document_type: "CC".to_string(),
        document_number: "1234567890".to_string(),
        first_name: "Maria".to_string(),
        last_name: "Cardenas".to_string(),
        email: "maria.cardenas@example.com".to_string(),
        phone: "3005551234".to_string(),
        salary: dec!(5_000_000),
        affiliation_date: Some(NaiveDate::from_ymd_opt(2020, 1, 15).expect("valid date")),
        status: AffiliateStatus::Active,
    }
}

pub(super) fn affiliate_with_tenure(start: NaiveDate) -> Affiliate {
    Affiliate {
        affiliation_date: Some(start),
        ..affiliate()
    }
}

pub(super) fn request() -> ApplicationRequest {
    ApplicationRequest {
        requested_amount: Some(dec!(10_000_000)),
        term_months: Some(24),
        interest_rate: dec!(12.5),
        monthly_income: Some(dec!(5_000_000)),
        current_debt: Some(Decimal::ZERO),
        purpose: "Home improvement".to_string(),
    }
}

pub(super) fn assessment(score: i32) -> RiskAssessment {
    RiskAssessment {
        score,
        risk_level: RiskLevel::from_score(score),
        recommendation: Recommendation::from_score(score),
        risk_factors: vec![
            "Excellent debt-to-income ratio".to_string(),
            "High income level".to_string(),
            "Conservative loan amount".to_string(),
            "Medium-term loan".to_string(),
        ],
        external_reference: None,
    }
}

pub(super) fn validator() -> EligibilityValidator {
    EligibilityValidator::new(EligibilityPolicy::default())
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 30).expect("valid date")
}

/// In-memory repository backing service and router tests.
#[derive(Default)]
pub(super) struct MemoryRepository {
    affiliates: Mutex<HashMap<AffiliateId, Affiliate>>,
    applications: Mutex<HashMap<ApplicationId, CreditApplication>>,
}

impl MemoryRepository {
    pub(super) fn with_affiliate(affiliate: Affiliate) -> Self {
        let repository = Self::default();
        repository
            .affiliates
            .lock()
            .expect("affiliate mutex poisoned")
            .insert(affiliate.id, affiliate);
        repository
    }

    pub(super) fn stored_application(&self, id: ApplicationId) -> Option<CreditApplication> {
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .get(&id)
            .cloned()
    }
}

impl UnderwritingRepository for MemoryRepository {
    fn affiliate(&self, id: AffiliateId) -> Result<Option<Affiliate>, RepositoryError> {
        Ok(self
            .affiliates
            .lock()
            .expect("affiliate mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn insert_application(
        &self,
        application: CreditApplication,
    ) -> Result<CreditApplication, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id, application.clone());
        Ok(application)
    }

    fn update_application(&self, application: CreditApplication) -> Result<(), RepositoryError> {
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .insert(application.id, application);
        Ok(())
    }

    fn application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<CreditApplication>, RepositoryError> {
        Ok(self
            .applications
            .lock()
            .expect("application mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn applications_for_affiliate(
        &self,
        id: AffiliateId,
    ) -> Result<Vec<CreditApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        let mut applications: Vec<_> = guard
            .values()
            .filter(|application| application.affiliate_id == id)
            .cloned()
            .collect();
        applications.sort_by_key(|application| application.id.0);
        Ok(applications)
    }

    fn has_pending_application(&self, id: AffiliateId) -> Result<bool, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard.values().any(|application| {
            application.affiliate_id == id && application.status == ApplicationStatus::Pending
        }))
    }
}

/// Scorer double returning a canned assessment, for driving specific status
/// transitions through the service.
pub(super) struct ScriptedScorer {
    pub(super) assessment: RiskAssessment,
}

impl ScoringProvider for ScriptedScorer {
    fn evaluate(&self, _request: &RiskRequest) -> Result<RiskAssessment, ScoringProviderError> {
        Ok(self.assessment.clone())
    }
}

/// Scorer double that always fails, modelling a remote transport outage.
pub(super) struct OfflineScorer;

impl ScoringProvider for OfflineScorer {
    fn evaluate(&self, _request: &RiskRequest) -> Result<RiskAssessment, ScoringProviderError> {
        Err(ScoringProviderError::Unavailable(
            "connection refused".to_string(),
        ))
    }
}

pub(super) fn build_service() -> (
    UnderwritingService<MemoryRepository, RiskScorer>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::with_affiliate(affiliate()));
    let service = UnderwritingService::new(
        repository.clone(),
        Arc::new(RiskScorer::default()),
        EligibilityPolicy::default(),
    );
    (service, repository)
}

pub(super) fn build_scripted_service(
    score: i32,
) -> (
    UnderwritingService<MemoryRepository, ScriptedScorer>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::with_affiliate(affiliate()));
    let service = UnderwritingService::new(
        repository.clone(),
        Arc::new(ScriptedScorer {
            assessment: assessment(score),
        }),
        EligibilityPolicy::default(),
    );
    (service, repository)
}
