pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, patch, post, put};
use axum::Router;
use db::{create_pool, run_migrations, seed_database, DbError};
use drafting::{Credentials, DraftAssembler};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::ServerConfig;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PM Studio API",
        version = "0.1.0",
        description = "Requirement backlog with ROI ranking and AI-drafted PRDs and test cases"
    ),
    paths(
        routes::health_check,
        routes::requirements::list_requirements,
        routes::requirements::create_requirement,
        routes::requirements::get_requirement,
        routes::requirements::update_requirement_status,
        routes::requirements::prioritize_requirements,
        routes::requirements::list_buckets,
        routes::requirements::list_squads,
        routes::requirements::preview_metrics,
        routes::requirements::get_summary,
        routes::prd::generate_prd,
        routes::prd::list_prds,
        routes::prd::get_prd,
        routes::prd::get_requirement_prd,
        routes::test_cases::generate_test_cases,
        routes::test_cases::list_test_cases,
        routes::test_cases::get_test_case,
        routes::test_cases::list_requirement_test_cases,
        routes::ai_providers::list_providers,
    ),
    components(schemas(
        routes::HealthResponse,
        routes::requirements::PrioritizeRequest,
        routes::requirements::PrioritizeResponse,
        routes::prd::GenerateRequest,
        routes::ai_providers::ProviderStatus,
        routes::ai_providers::ProvidersResponse,
        error::ErrorResponse,
        pm_core::Requirement,
        pm_core::RequirementStatus,
        pm_core::RequirementDetails,
        pm_core::CreateRequirementRequest,
        pm_core::UpdateStatusRequest,
        pm_core::PriorityAssignment,
        pm_core::Metrics,
        pm_core::MetricsInput,
        pm_core::MetricInputs,
        pm_core::Bucket,
        pm_core::BucketKind,
        pm_core::Squad,
        pm_core::Prd,
        pm_core::PrdDraft,
        pm_core::DeltaPrototypes,
        pm_core::GeneratedBy,
        pm_core::TestCase,
        pm_core::TestCaseDraft,
        pm_core::TestStep,
        pm_core::SummaryFilter,
        pm_core::PortfolioSummary,
        drafting::ProviderId,
        drafting::ProviderInfo,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "requirements", description = "Backlog, ranking and reference data"),
        (name = "prd", description = "Product requirement documents"),
        (name = "test-cases", description = "Generated test cases"),
        (name = "ai-providers", description = "Text-generation provider catalogue"),
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health_check))
        .route(
            "/api/requirements",
            get(routes::requirements::list_requirements)
                .post(routes::requirements::create_requirement),
        )
        .route(
            "/api/requirements/prioritize",
            put(routes::requirements::prioritize_requirements),
        )
        .route(
            "/api/requirements/buckets",
            get(routes::requirements::list_buckets),
        )
        .route(
            "/api/requirements/squads",
            get(routes::requirements::list_squads),
        )
        .route(
            "/api/requirements/summary",
            get(routes::requirements::get_summary),
        )
        .route(
            "/api/requirements/metrics/preview",
            post(routes::requirements::preview_metrics),
        )
        .route(
            "/api/requirements/{id}",
            get(routes::requirements::get_requirement),
        )
        .route(
            "/api/requirements/{id}/status",
            patch(routes::requirements::update_requirement_status),
        )
        .route(
            "/api/requirements/{id}/prd",
            get(routes::prd::get_requirement_prd),
        )
        .route(
            "/api/requirements/{id}/test-cases",
            get(routes::test_cases::list_requirement_test_cases),
        )
        .route("/api/prd", get(routes::prd::list_prds))
        .route("/api/prd/generate", post(routes::prd::generate_prd))
        .route("/api/prd/{id}", get(routes::prd::get_prd))
        .route("/api/test-cases", get(routes::test_cases::list_test_cases))
        .route(
            "/api/test-cases/generate",
            post(routes::test_cases::generate_test_cases),
        )
        .route("/api/test-cases/{id}", get(routes::test_cases::get_test_case))
        .route("/api/ai-providers", get(routes::ai_providers::list_providers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Open the database, apply migrations, seed it and wire up the drafting
/// assembler.
pub async fn build_state(
    config: &ServerConfig,
    credentials: Credentials,
) -> Result<AppState, DbError> {
    let pool = create_pool(&config.server.database_url).await?;
    run_migrations(&pool).await?;

    let report = seed_database(&pool, config.server.seed_sample_data).await?;
    tracing::info!(
        buckets = report.buckets,
        squads = report.squads,
        requirements = report.requirements,
        "Database ready"
    );

    let assembler = DraftAssembler::new(config.assembler_config(), credentials);
    Ok(AppState::new(pool, assembler))
}
