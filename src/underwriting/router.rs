use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{AffiliateId, ApplicationId, ApplicationRequest};
use super::repository::{RepositoryError, ScoringProvider, UnderwritingRepository};
use super::service::{UnderwritingError, UnderwritingService};

/// Router builder exposing the caller-facing underwriting operations.
pub fn underwriting_router<R, S>(service: Arc<UnderwritingService<R, S>>) -> Router
where
    R: UnderwritingRepository + 'static,
    S: ScoringProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/affiliates/:affiliate_id/applications",
            post(submit_handler::<R, S>).get(list_handler::<R, S>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_handler::<R, S>),
        )
        .route(
            "/api/v1/applications/:application_id/evaluate",
            post(evaluate_handler::<R, S>),
        )
        .route(
            "/api/v1/applications/:application_id/approve",
            post(approve_handler::<R, S>),
        )
        .route(
            "/api/v1/applications/:application_id/reject",
            post(reject_handler::<R, S>),
        )
        .with_state(service)
}

async fn submit_handler<R, S>(
    State(service): State<Arc<UnderwritingService<R, S>>>,
    Path(affiliate_id): Path<i64>,
    axum::Json(request): axum::Json<ApplicationRequest>,
) -> Response
where
    R: UnderwritingRepository + 'static,
    S: ScoringProvider + 'static,
{
    match service.submit(AffiliateId(affiliate_id), request) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn list_handler<R, S>(
    State(service): State<Arc<UnderwritingService<R, S>>>,
    Path(affiliate_id): Path<i64>,
) -> Response
where
    R: UnderwritingRepository + 'static,
    S: ScoringProvider + 'static,
{
    match service.applications_for_affiliate(AffiliateId(affiliate_id)) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_handler<R, S>(
    State(service): State<Arc<UnderwritingService<R, S>>>,
    Path(application_id): Path<i64>,
) -> Response
where
    R: UnderwritingRepository + 'static,
    S: ScoringProvider + 'static,
{
    match service.get(ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn evaluate_handler<R, S>(
    State(service): State<Arc<UnderwritingService<R, S>>>,
    Path(application_id): Path<i64>,
) -> Response
where
    R: UnderwritingRepository + 'static,
    S: ScoringProvider + 'static,
{
    match service.evaluate(ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn approve_handler<R, S>(
    State(service): State<Arc<UnderwritingService<R, S>>>,
    Path(application_id): Path<i64>,
) -> Response
where
    R: UnderwritingRepository + 'static,
    S: ScoringProvider + 'static,
{
    match service.approve(ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn reject_handler<R, S>(
    State(service): State<Arc<UnderwritingService<R, S>>>,
    Path(application_id): Path<i64>,
) -> Response
where
    R: UnderwritingRepository + 'static,
    S: ScoringProvider + 'static,
{
    match service.reject(ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Uniform error payload: business violations carry their stable code so API
/// clients can branch without parsing messages.
fn error_response(err: UnderwritingError) -> Response {
    match err {
        UnderwritingError::Rule(violation) => {
            let payload = json!({
                "code": violation.code(),
                "message": violation.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        UnderwritingError::NotFound { resource, id } => {
            let payload = json!({
                "code": "NOT_FOUND",
                "message": format!("{resource} {id} not found"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        UnderwritingError::Repository(RepositoryError::Conflict) => {
            let payload = json!({
                "code": "CONFLICT",
                "message": "application already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        UnderwritingError::Repository(other) => {
            let payload = json!({
                "code": "INTERNAL",
                "message": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
