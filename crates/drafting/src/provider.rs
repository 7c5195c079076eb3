use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DraftResult;

/// Built-in text-generation services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::OpenAi, ProviderId::Anthropic, ProviderId::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Gemini => "Google Gemini",
        }
    }

    pub fn models(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => &["gpt-3.5-turbo", "gpt-4", "gpt-4-turbo"],
            Self::Anthropic => &["claude-instant-1", "claude-2", "claude-3-opus"],
            Self::Gemini => &["gemini-2.0-flash", "gemini-2.0-pro-exp"],
        }
    }

    /// Environment variable holding the process-wide credential.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI models for text generation and completion",
            Self::Anthropic => "Anthropic Claude models for natural language tasks",
            Self::Gemini => "Google Gemini models for advanced AI capabilities",
        }
    }

    pub fn default_model(&self) -> &'static str {
        self.models()[0]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalogue entry describing one provider.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: ProviderId,
    pub name: String,
    pub models: Vec<String>,
    pub api_key_name: String,
    pub description: String,
}

impl From<ProviderId> for ProviderInfo {
    fn from(id: ProviderId) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            models: id.models().iter().map(|m| m.to_string()).collect(),
            api_key_name: id.api_key_env().to_string(),
            description: id.description().to_string(),
        }
    }
}

pub fn catalog() -> Vec<ProviderInfo> {
    ProviderId::ALL.into_iter().map(ProviderInfo::from).collect()
}

/// A text-generation service: prompt in, raw text out.
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    async fn generate(&self, prompt: &str, model: &str, api_key: &str) -> DraftResult<String>;
}
