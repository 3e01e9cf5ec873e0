//! Stress Assessment Handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateAssessmentRequest, ListQueryParams};
use crate::application::dto::response::AssessmentResponse;
use crate::application::services::{
    NewAssessment, StressAnalysis, StressError, StressService, StressServiceImpl,
};
use crate::infrastructure::repositories::PgStressAssessmentRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn stress_service(state: &AppState) -> StressServiceImpl<PgStressAssessmentRepository> {
    StressServiceImpl::new(
        Arc::new(PgStressAssessmentRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_err(e: StressError) -> AppError {
    match e {
        StressError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Record a new stress assessment
pub async fn create_assessment(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentResponse>), AppError> {
    body.validate()
        .map_err(validation_error)?;

    let new = NewAssessment {
        stress_level: body.stress_level,
        anxiety_level: body.anxiety_level,
        sleep_quality: body.sleep_quality,
        energy_level: body.energy_level,
        notes: body.notes,
    };

    let assessment = stress_service(&state)
        .create_assessment(auth_user.user_id, new)
        .await
        .map_err(map_err)?;

    Ok((StatusCode::CREATED, Json(AssessmentResponse::from(assessment))))
}

/// List recent assessments
pub async fn list_assessments(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<ListQueryParams>,
) -> Result<Json<Vec<AssessmentResponse>>, AppError> {
    let assessments = stress_service(&state)
        .list_assessments(auth_user.user_id, params.limit.unwrap_or(30))
        .await
        .map_err(map_err)?;

    Ok(Json(
        assessments
            .into_iter()
            .map(AssessmentResponse::from)
            .collect(),
    ))
}

/// Stress statistics and trend over recent assessments
pub async fn analyze(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<StressAnalysis>, AppError> {
    let analysis = stress_service(&state)
        .analyze(auth_user.user_id)
        .await
        .map_err(map_err)?;

    Ok(Json(analysis))
}
