use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pm_core::{
    summarize, Bucket, CoreError, CreateRequirementRequest, MetricInputs, Metrics, MetricsInput,
    PortfolioSummary, PriorityAssignment, Requirement, RequirementDetails, Squad, SummaryFilter,
    UpdateStatusRequest,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PrioritizeRequest {
    pub requirements: Vec<PriorityAssignment>,
}

#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PrioritizeResponse {
    pub success: bool,
    pub updated: usize,
}

/// Bucket and squad lookup tables for attaching references to requirements.
pub(crate) struct References {
    buckets: HashMap<Uuid, Bucket>,
    squads: HashMap<Uuid, Squad>,
}

impl References {
    pub(crate) async fn load(state: &AppState) -> Result<Self, AppError> {
        let buckets = state.bucket_repository.find_all().await?;
        let squads = state.squad_repository.find_all().await?;

        Ok(Self {
            buckets: buckets.into_iter().map(|b| (b.id, b)).collect(),
            squads: squads.into_iter().map(|s| (s.id, s)).collect(),
        })
    }

    pub(crate) fn bucket(&self, id: Uuid) -> Result<&Bucket, CoreError> {
        self.buckets.get(&id).ok_or(CoreError::BucketNotFound(id))
    }

    pub(crate) fn squad(&self, id: Uuid) -> Result<&Squad, CoreError> {
        self.squads.get(&id).ok_or(CoreError::SquadNotFound(id))
    }

    /// A stored requirement whose references are gone is a storage fault,
    /// not a bad request.
    pub(crate) fn details(&self, requirement: Requirement) -> Result<RequirementDetails, AppError> {
        let bucket = self.bucket(requirement.bucket_id).map_err(storage_fault)?.clone();
        let squad = self.squad(requirement.squad_id).map_err(storage_fault)?.clone();

        Ok(RequirementDetails {
            requirement,
            bucket,
            squad,
        })
    }
}

fn storage_fault(err: CoreError) -> AppError {
    AppError::Storage(format!("dangling reference: {}", err))
}

#[utoipa::path(
    get,
    path = "/api/requirements",
    responses(
        (status = 200, description = "All requirements, priority ascending", body = Vec<RequirementDetails>)
    ),
    tag = "requirements"
)]
pub async fn list_requirements(
    State(state): State<AppState>,
) -> Result<Json<Vec<RequirementDetails>>, AppError> {
    let requirements = state.orderer.list_by_priority().await?;
    let references = References::load(&state).await?;

    let details = requirements
        .into_iter()
        .map(|r| references.details(r))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/api/requirements",
    request_body = CreateRequirementRequest,
    responses(
        (status = 201, description = "Requirement created and backlog re-ranked", body = RequirementDetails),
        (status = 400, description = "Missing or out-of-range field", body = ErrorResponse)
    ),
    tag = "requirements"
)]
pub async fn create_requirement(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequirementRequest>,
) -> Result<(StatusCode, Json<RequirementDetails>), AppError> {
    let requirement = payload.into_requirement()?;

    let references = References::load(&state).await?;
    references.bucket(requirement.bucket_id)?;
    references.squad(requirement.squad_id)?;

    let created = state.orderer.submit(requirement).await?;
    tracing::info!(
        requirement_id = %created.id,
        roi = created.roi(),
        priority = created.priority,
        "Requirement created"
    );

    Ok((StatusCode::CREATED, Json(references.details(created)?)))
}

#[utoipa::path(
    get,
    path = "/api/requirements/{id}",
    params(("id" = Uuid, Path, description = "Requirement id")),
    responses(
        (status = 200, description = "Requirement with bucket and squad", body = RequirementDetails),
        (status = 404, description = "Requirement not found", body = ErrorResponse)
    ),
    tag = "requirements"
)]
pub async fn get_requirement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RequirementDetails>, AppError> {
    let requirement = state
        .requirement_repository
        .find_by_id(id)
        .await?
        .ok_or(CoreError::RequirementNotFound(id))?;

    let references = References::load(&state).await?;
    Ok(Json(references.details(requirement)?))
}

#[utoipa::path(
    patch,
    path = "/api/requirements/{id}/status",
    params(("id" = Uuid, Path, description = "Requirement id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Requirement),
        (status = 404, description = "Requirement not found", body = ErrorResponse)
    ),
    tag = "requirements"
)]
pub async fn update_requirement_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Requirement>, AppError> {
    let updated = state
        .requirement_repository
        .update_status(id, payload.status)
        .await?;

    match updated {
        Some(r) => Ok(Json(r)),
        None => Err(AppError::NotFound(format!("Requirement not found: {}", id))),
    }
}

#[utoipa::path(
    put,
    path = "/api/requirements/prioritize",
    request_body = PrioritizeRequest,
    responses(
        (status = 200, description = "Priorities written as given", body = PrioritizeResponse),
        (status = 404, description = "Unknown requirement id; nothing written", body = ErrorResponse)
    ),
    tag = "requirements"
)]
pub async fn prioritize_requirements(
    State(state): State<AppState>,
    Json(payload): Json<PrioritizeRequest>,
) -> Result<Json<PrioritizeResponse>, AppError> {
    state.orderer.apply_manual_order(&payload.requirements).await?;

    Ok(Json(PrioritizeResponse {
        success: true,
        updated: payload.requirements.len(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/requirements/buckets",
    responses((status = 200, description = "All buckets", body = Vec<Bucket>)),
    tag = "requirements"
)]
pub async fn list_buckets(State(state): State<AppState>) -> Result<Json<Vec<Bucket>>, AppError> {
    Ok(Json(state.bucket_repository.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/requirements/squads",
    responses((status = 200, description = "All squads", body = Vec<Squad>)),
    tag = "requirements"
)]
pub async fn list_squads(State(state): State<AppState>) -> Result<Json<Vec<Squad>>, AppError> {
    Ok(Json(state.squad_repository.find_all().await?))
}

#[utoipa::path(
    post,
    path = "/api/requirements/metrics/preview",
    request_body = MetricsInput,
    responses(
        (status = 200, description = "Metrics as they would be stored", body = Metrics),
        (status = 400, description = "Missing or out-of-range field", body = ErrorResponse)
    ),
    tag = "requirements"
)]
pub async fn preview_metrics(Json(payload): Json<MetricsInput>) -> Result<Json<Metrics>, AppError> {
    let inputs = MetricInputs::from_input(&payload)?;
    Ok(Json(Metrics::compute(inputs)))
}

#[utoipa::path(
    get,
    path = "/api/requirements/summary",
    params(SummaryFilter),
    responses((status = 200, description = "Portfolio rollup", body = PortfolioSummary)),
    tag = "requirements"
)]
pub async fn get_summary(
    State(state): State<AppState>,
    Query(filter): Query<SummaryFilter>,
) -> Result<Json<PortfolioSummary>, AppError> {
    let requirements = state.requirement_repository.find_all().await?;
    let buckets = state.bucket_repository.find_all().await?;
    let squads = state.squad_repository.find_all().await?;

    Ok(Json(summarize(&requirements, &buckets, &squads, &filter)))
}
