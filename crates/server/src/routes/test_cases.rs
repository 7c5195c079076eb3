use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pm_core::TestCase;
use uuid::Uuid;

use super::prd::{brief_for, load_requirement, GenerateRequest};
use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/test-cases/generate",
    request_body = GenerateRequest,
    responses(
        (status = 201, description = "Test cases drafted and stored", body = Vec<TestCase>),
        (status = 400, description = "Requirement ID missing", body = ErrorResponse),
        (status = 404, description = "Requirement not found", body = ErrorResponse)
    ),
    tag = "test-cases"
)]
pub async fn generate_test_cases(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<Vec<TestCase>>), AppError> {
    let requirement_id = payload.requirement_id()?;
    let requirement = load_requirement(&state, requirement_id).await?;
    let prd = state.prd_repository.find_by_requirement(requirement_id).await?;

    let brief = brief_for(&state, &requirement).await?;
    let drafted = state
        .assembler
        .draft_test_cases(&brief, prd.as_ref(), &payload.options())
        .await;

    let cases: Vec<TestCase> = drafted
        .content
        .into_iter()
        .map(|draft| TestCase::new(requirement_id, draft))
        .collect();

    let stored = state.test_case_repository.create_many(&cases).await?;
    let ids: Vec<Uuid> = stored.iter().map(|c| c.id).collect();
    state
        .requirement_repository
        .append_test_cases(requirement_id, &ids)
        .await?;

    tracing::info!(
        requirement_id = %requirement_id,
        count = stored.len(),
        with_prd = prd.is_some(),
        fallback = drafted.used_fallback,
        "Test cases stored"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}

#[utoipa::path(
    get,
    path = "/api/test-cases",
    responses((status = 200, description = "All test cases", body = Vec<TestCase>)),
    tag = "test-cases"
)]
pub async fn list_test_cases(State(state): State<AppState>) -> Result<Json<Vec<TestCase>>, AppError> {
    Ok(Json(state.test_case_repository.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/test-cases/{id}",
    params(("id" = Uuid, Path, description = "Test case id")),
    responses(
        (status = 200, description = "Test case", body = TestCase),
        (status = 404, description = "Test case not found", body = ErrorResponse)
    ),
    tag = "test-cases"
)]
pub async fn get_test_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TestCase>, AppError> {
    state
        .test_case_repository
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Test case not found: {}", id)))
}

#[utoipa::path(
    get,
    path = "/api/requirements/{id}/test-cases",
    params(("id" = Uuid, Path, description = "Requirement id")),
    responses(
        (status = 200, description = "Test cases for the requirement, oldest first", body = Vec<TestCase>),
        (status = 404, description = "Requirement not found", body = ErrorResponse)
    ),
    tag = "test-cases"
)]
pub async fn list_requirement_test_cases(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TestCase>>, AppError> {
    load_requirement(&state, id).await?;
    Ok(Json(state.test_case_repository.find_by_requirement(id).await?))
}
