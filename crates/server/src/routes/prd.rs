use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use drafting::{GenerationOptions, RequirementBrief};
use pm_core::{CoreError, Prd, Requirement};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::requirements::References;
use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

/// Body shared by the PRD and test-case generation endpoints. The camelCase
/// spellings are accepted too.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct GenerateRequest {
    #[serde(default, alias = "requirementId")]
    pub requirement_id: Option<Uuid>,
    #[serde(default, alias = "providerId")]
    pub provider_id: Option<String>,
    #[serde(default, alias = "modelId")]
    pub model_id: Option<String>,
    #[serde(default, alias = "apiKey")]
    pub api_key: Option<String>,
}

impl GenerateRequest {
    pub fn requirement_id(&self) -> Result<Uuid, AppError> {
        self.requirement_id
            .ok_or_else(|| AppError::BadRequest("Requirement ID is required".to_string()))
    }

    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            provider: non_blank(&self.provider_id),
            model: non_blank(&self.model_id),
            api_key: non_blank(&self.api_key),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) async fn load_requirement(state: &AppState, id: Uuid) -> Result<Requirement, AppError> {
    state
        .requirement_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::RequirementNotFound(id).into())
}

pub(crate) async fn brief_for(
    state: &AppState,
    requirement: &Requirement,
) -> Result<RequirementBrief, AppError> {
    let references = References::load(state).await?;
    let details = references.details(requirement.clone())?;
    Ok(RequirementBrief::new(
        &details.requirement,
        &details.bucket,
        &details.squad,
    ))
}

#[utoipa::path(
    post,
    path = "/api/prd/generate",
    request_body = GenerateRequest,
    responses(
        (status = 201, description = "PRD drafted and stored", body = Prd),
        (status = 400, description = "Requirement ID missing", body = ErrorResponse),
        (status = 404, description = "Requirement not found", body = ErrorResponse),
        (status = 409, description = "Requirement already has a PRD", body = ErrorResponse)
    ),
    tag = "prd"
)]
pub async fn generate_prd(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<Prd>), AppError> {
    let requirement_id = payload.requirement_id()?;
    let requirement = load_requirement(&state, requirement_id).await?;

    // Rechecked under the guard before storing.
    if state.requirement_repository.prd_exists_for(requirement_id).await? {
        return Err(CoreError::PrdAlreadyExists(requirement_id).into());
    }

    let brief = brief_for(&state, &requirement).await?;
    let drafted = state.assembler.draft_prd(&brief, &payload.options()).await;

    let _guard = state.prd_guard.lock().await;
    if state.requirement_repository.prd_exists_for(requirement_id).await? {
        return Err(CoreError::PrdAlreadyExists(requirement_id).into());
    }

    let prd = Prd::from_draft(&requirement, drafted.content, drafted.generated_by);
    let prd = state.prd_repository.create(&prd).await?;

    tracing::info!(
        requirement_id = %requirement_id,
        prd_id = %prd.id,
        fallback = drafted.used_fallback,
        "PRD stored"
    );

    Ok((StatusCode::CREATED, Json(prd)))
}

#[utoipa::path(
    get,
    path = "/api/prd",
    responses((status = 200, description = "All PRDs, newest first", body = Vec<Prd>)),
    tag = "prd"
)]
pub async fn list_prds(State(state): State<AppState>) -> Result<Json<Vec<Prd>>, AppError> {
    Ok(Json(state.prd_repository.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/prd/{id}",
    params(("id" = Uuid, Path, description = "PRD id")),
    responses(
        (status = 200, description = "PRD", body = Prd),
        (status = 404, description = "PRD not found", body = ErrorResponse)
    ),
    tag = "prd"
)]
pub async fn get_prd(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Prd>, AppError> {
    state
        .prd_repository
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("PRD not found: {}", id)))
}

#[utoipa::path(
    get,
    path = "/api/requirements/{id}/prd",
    params(("id" = Uuid, Path, description = "Requirement id")),
    responses(
        (status = 200, description = "The requirement's PRD", body = Prd),
        (status = 404, description = "Requirement or PRD not found", body = ErrorResponse)
    ),
    tag = "prd"
)]
pub async fn get_requirement_prd(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Prd>, AppError> {
    load_requirement(&state, id).await?;

    state
        .prd_repository
        .find_by_requirement(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No PRD for requirement: {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_accepts_camel_case() {
        let id = Uuid::new_v4();
        let body = format!(
            r#"{{"requirementId": "{id}", "providerId": "openai", "modelId": " ", "apiKey": "sk-1"}}"#
        );
        let request: GenerateRequest = serde_json::from_str(&body).unwrap();

        assert_eq!(request.requirement_id().unwrap(), id);
        let options = request.options();
        assert_eq!(options.provider.as_deref(), Some("openai"));
        assert_eq!(options.model, None);
        assert_eq!(options.api_key.as_deref(), Some("sk-1"));
    }

    #[test]
    fn test_generate_request_requires_requirement() {
        let request: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            request.requirement_id(),
            Err(AppError::BadRequest(_))
        ));
    }
}
