//! End-to-end coverage for the credit underwriting workflow.
//!
//! Scenarios drive the public service facade and HTTP router end to end:
//! submission gating, deterministic evaluation, manual analyst overrides, and
//! the error surface, without reaching into private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use coopcredit::underwriting::{
        Affiliate, AffiliateId, AffiliateStatus, ApplicationId, ApplicationRequest,
        ApplicationStatus, CreditApplication, EligibilityPolicy, RepositoryError, RiskScorer,
        UnderwritingRepository, UnderwritingService,
    };

    pub const AFFILIATE_ID: AffiliateId = AffiliateId(7);

    pub fn affiliate() -> Affiliate {
        Affiliate {
            id: AFFILIATE_ID,
            document_type: "CC".to_string(),
            document_number: "52968741".to_string(),
            first_name: "Lucia".to_string(),
            last_name: "Pardo".to_string(),
            email: "lucia.pardo@example.com".to_string(),
            phone: "3017654321".to_string(),
            salary: dec!(4_000_000),
            affiliation_date: Some(NaiveDate::from_ymd_opt(2021, 3, 10).expect("valid date")),
            status: AffiliateStatus::Active,
        }
    }

    pub fn request() -> ApplicationRequest {
        ApplicationRequest {
            requested_amount: Some(dec!(12_000_000)),
            term_months: Some(12),
            interest_rate: dec!(14),
            monthly_income: Some(dec!(5_000_000)),
            current_debt: Some(Decimal::ZERO),
            purpose: "Debt consolidation".to_string(),
        }
    }

    #[derive(Default)]
    pub struct MemoryRepository {
        affiliates: Mutex<HashMap<AffiliateId, Affiliate>>,
        applications: Mutex<HashMap<ApplicationId, CreditApplication>>,
    }

    impl MemoryRepository {
        pub fn with_affiliate(affiliate: Affiliate) -> Self {
            let repository = Self::default();
            repository
                .affiliates
                .lock()
                .expect("affiliate mutex poisoned")
                .insert(affiliate.id, affiliate);
            repository
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

        fn update_application(
            &self,
            application: CreditApplication,
        ) -> Result<(), RepositoryError> {
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
            Ok(guard
                .values()
                .filter(|application| application.affiliate_id == id)
                .cloned()
                .collect())
        }

        fn has_pending_application(&self, id: AffiliateId) -> Result<bool, RepositoryError> {
            let guard = self.applications.lock().expect("application mutex poisoned");
            Ok(guard.values().any(|application| {
                application.affiliate_id == id
                    && application.status == ApplicationStatus::Pending
            }))
        }
    }

    pub fn build_service() -> UnderwritingService<MemoryRepository, RiskScorer> {
        UnderwritingService::new(
            Arc::new(MemoryRepository::with_affiliate(affiliate())),
            Arc::new(RiskScorer::default()),
            EligibilityPolicy::default(),
        )
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{build_service, request, AFFILIATE_ID};
use coopcredit::underwriting::{
    underwriting_router, ApplicationStatus, RuleViolation, UnderwritingError,
};

#[test]
fn full_pipeline_submits_evaluates_and_records_the_decision() {
    let service = build_service();

    let submitted = service.submit(AFFILIATE_ID, request()).expect("submits");
    assert_eq!(submitted.status, ApplicationStatus::Pending);

    let evaluated = service.evaluate(submitted.id).expect("evaluates");

    // Deterministic profile: base 544 for this document, +200 debt ratio,
    // +125 income, +100 loan amount, +75 short term = 1000 after clamping.
    let assessment = evaluated.evaluation.as_ref().expect("assessment attached");
    assert_eq!(assessment.score, 1000);
    assert_eq!(evaluated.status, ApplicationStatus::Approved);
    assert_eq!(assessment.risk_factors.len(), 4);
    assert!(evaluated
        .evaluation_comments
        .as_deref()
        .expect("comments recorded")
        .starts_with("Credit Score: 1000"));

    // Re-running evaluation must fail rather than re-score.
    match service.evaluate(submitted.id) {
        Err(UnderwritingError::Rule(RuleViolation::InvalidApplicationStatus { .. })) => {}
        other => panic!("expected invalid-status violation, got {other:?}"),
    }
}

#[test]
fn affiliate_ceiling_binds_at_ten_times_salary() {
    let service = build_service();

    // Salary 4,000,000: a 40M request is exactly at the ceiling but exceeds
    // the 50% payment-to-income gate, so push income up and stretch the term.
    let mut at_limit = request();
    at_limit.requested_amount = Some(dec!(40_000_000));
    at_limit.term_months = Some(60);
    at_limit.monthly_income = Some(dec!(8_000_000));
    at_limit.interest_rate = dec!(0);
    service
        .submit(AFFILIATE_ID, at_limit)
        .expect("exactly 10x salary passes");

    let service = build_service();
    let mut over_limit = request();
    over_limit.requested_amount = Some(dec!(40_000_001));
    over_limit.term_months = Some(60);
    over_limit.monthly_income = Some(dec!(8_000_000));
    over_limit.interest_rate = dec!(0);

    match service.submit(AFFILIATE_ID, over_limit) {
        Err(UnderwritingError::Rule(violation)) => {
            assert_eq!(violation.code(), "AMOUNT_EXCEEDS_AFFILIATE_LIMIT");
        }
        other => panic!("expected ceiling violation, got {other:?}"),
    }
}

#[test]
fn analyst_can_override_an_automatic_rejection() {
    let service = build_service();

    // A heavily indebted profile lands below the auto-reject threshold.
    let mut weak = request();
    weak.requested_amount = Some(dec!(30_000_000));
    weak.term_months = Some(60);
    weak.monthly_income = Some(dec!(1_500_000));
    weak.current_debt = Some(dec!(600_000));
    weak.interest_rate = dec!(0);

    let submitted = service.submit(AFFILIATE_ID, weak).expect("submits");
    let evaluated = service.evaluate(submitted.id).expect("evaluates");
    assert_eq!(evaluated.status, ApplicationStatus::Rejected);

    let overridden = service.approve(submitted.id).expect("override applies");
    assert_eq!(overridden.status, ApplicationStatus::Approved);
}

#[tokio::test]
async fn http_surface_round_trips_the_workflow() {
    let service = Arc::new(build_service());
    let app = underwriting_router(service);

    let body = json!({
        "requested_amount": "12000000",
        "term_months": 12,
        "interest_rate": "14",
        "monthly_income": "5000000",
        "current_debt": "0",
        "purpose": "Debt consolidation"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/affiliates/7/applications")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);

    let payload: Value = serde_json::from_slice(
        &axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body"),
    )
    .expect("json payload");
    let id = payload["id"].as_i64().expect("application id");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/applications/{id}/evaluate"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let payload: Value = serde_json::from_slice(
        &axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body"),
    )
    .expect("json payload");
    assert_eq!(payload["status"], "APPROVED");
    assert_eq!(payload["evaluation"]["risk_level"], "LOW");
}
