//! HTTP strategies for the built-in providers.

mod anthropic;
mod gemini;
mod openai;

pub use anthropic::{AnthropicProvider, DEFAULT_ANTHROPIC_BASE_URL};
pub use gemini::{GeminiProvider, DEFAULT_GEMINI_BASE_URL};
pub use openai::{OpenAiProvider, DEFAULT_OPENAI_BASE_URL};

use reqwest::Response;
use serde::Deserialize;
use tracing::warn;

use crate::error::{DraftError, DraftResult};

pub(crate) const MAX_TOKENS: u32 = 2500;
pub(crate) const TEMPERATURE: f32 = 0.7;

/// Error body shape shared by all three services.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pass a successful response through; turn anything else into
/// [`DraftError::ProviderApi`] carrying the service's own message when it
/// sent one.
pub(crate) async fn check_status(provider: &'static str, response: Response) -> DraftResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();

    if status.as_u16() == 429 {
        warn!(provider, "Rate limited by provider");
    }

    let message = match serde_json::from_str::<ApiErrorBody>(&error_text) {
        Ok(body) => body.error.message,
        Err(_) => error_text,
    };
    warn!(provider, status = status.as_u16(), "Provider API error: {}", message);

    Err(DraftError::ProviderApi {
        provider,
        message,
        status_code: Some(status.as_u16()),
    })
}
