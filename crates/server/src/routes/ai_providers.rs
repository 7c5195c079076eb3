use axum::extract::State;
use axum::Json;
use drafting::{catalog, ProviderId, ProviderInfo};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    #[serde(flatten)]
    pub info: ProviderInfo,
    /// A server-side key is set; callers may omit `apiKey`.
    pub configured: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderStatus>,
    pub default_provider: ProviderId,
    pub default_model: String,
}

#[utoipa::path(
    get,
    path = "/api/ai-providers",
    responses((status = 200, description = "Provider catalogue", body = ProvidersResponse)),
    tag = "ai-providers"
)]
pub async fn list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let providers = catalog()
        .into_iter()
        .map(|info| ProviderStatus {
            configured: state.assembler.has_credential(info.id),
            info,
        })
        .collect();

    Json(ProvidersResponse {
        providers,
        default_provider: state.assembler.default_provider(),
        default_model: state.assembler.default_model().to_string(),
    })
}
