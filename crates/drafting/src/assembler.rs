use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use pm_core::{GeneratedBy, Prd, PrdDraft, TestCaseDraft};
use reqwest::Client;
use tracing::{info, warn};

use crate::error::{DraftError, DraftResult};
use crate::fallback::{fallback_prd, fallback_test_cases};
use crate::parse::{parse_prd, parse_test_cases};
use crate::prompts::{prd_prompt, test_case_prompt, RequirementBrief};
use crate::provider::{ProviderId, TextProvider};
use crate::providers::{
    AnthropicProvider, GeminiProvider, OpenAiProvider, DEFAULT_ANTHROPIC_BASE_URL,
    DEFAULT_GEMINI_BASE_URL, DEFAULT_OPENAI_BASE_URL,
};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    pub default_provider: ProviderId,
    pub default_model: String,
    pub request_timeout: Duration,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub gemini_base_url: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            default_provider: ProviderId::Gemini,
            default_model: ProviderId::Gemini.default_model().to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

/// Process-wide provider credentials.
#[derive(Clone, Default)]
pub struct Credentials {
    keys: HashMap<ProviderId, String>,
}

impl Credentials {
    /// Read each provider's key from the environment variable it declares.
    pub fn from_env() -> Self {
        let mut credentials = Self::default();
        for id in ProviderId::ALL {
            if let Ok(key) = std::env::var(id.api_key_env()) {
                credentials = credentials.with(id, key);
            }
        }
        credentials
    }

    pub fn with(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.trim().is_empty() {
            self.keys.insert(provider, key);
        }
        self
    }

    pub fn get(&self, provider: ProviderId) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }

    pub fn has(&self, provider: ProviderId) -> bool {
        self.keys.contains_key(&provider)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("providers", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Per-call provider selection. Every field is optional and falls back to the
/// assembler's configuration.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

/// A draft plus the provider and model it was requested from.
#[derive(Debug, Clone)]
pub struct Drafted<T> {
    pub content: T,
    pub generated_by: GeneratedBy,
    pub used_fallback: bool,
}

/// Builds prompts, calls the selected provider and turns its reply into
/// drafts. Never fails: any provider problem yields a fallback document.
pub struct DraftAssembler {
    providers: HashMap<ProviderId, Arc<dyn TextProvider>>,
    credentials: Credentials,
    default_provider: ProviderId,
    default_model: String,
    request_timeout: Duration,
}

impl DraftAssembler {
    pub fn new(config: AssemblerConfig, credentials: Credentials) -> Self {
        let client = Client::new();
        let providers: Vec<Arc<dyn TextProvider>> = vec![
            Arc::new(OpenAiProvider::new(client.clone(), config.openai_base_url)),
            Arc::new(AnthropicProvider::new(client.clone(), config.anthropic_base_url)),
            Arc::new(GeminiProvider::new(client, config.gemini_base_url)),
        ];

        Self {
            providers: providers.into_iter().map(|p| (p.id(), p)).collect(),
            credentials,
            default_provider: config.default_provider,
            default_model: config.default_model,
            request_timeout: config.request_timeout,
        }
    }

    /// Replace the strategy registered under the provider's id.
    pub fn with_provider(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.providers.insert(provider.id(), provider);
        self
    }

    pub fn default_provider(&self) -> ProviderId {
        self.default_provider
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Whether a process-wide key is configured for `provider`.
    pub fn has_credential(&self, provider: ProviderId) -> bool {
        self.credentials.has(provider)
    }

    pub async fn draft_prd(
        &self,
        brief: &RequirementBrief,
        options: &GenerationOptions,
    ) -> Drafted<PrdDraft> {
        let prompt = prd_prompt(brief);
        let (generated_by, reply) = self.complete(&prompt, options).await;

        match reply.and_then(|text| parse_prd(&text)) {
            Ok(content) => {
                info!(provider = %generated_by.provider, model = %generated_by.model, "PRD drafted");
                Drafted {
                    content,
                    generated_by,
                    used_fallback: false,
                }
            }
            Err(e) => {
                warn!(
                    provider = %generated_by.provider,
                    model = %generated_by.model,
                    error = %e,
                    "PRD generation failed, using fallback document"
                );
                Drafted {
                    content: fallback_prd(&brief.title),
                    generated_by,
                    used_fallback: true,
                }
            }
        }
    }

    pub async fn draft_test_cases(
        &self,
        brief: &RequirementBrief,
        prd: Option<&Prd>,
        options: &GenerationOptions,
    ) -> Drafted<Vec<TestCaseDraft>> {
        let prompt = test_case_prompt(brief, prd);
        let (generated_by, reply) = self.complete(&prompt, options).await;

        match reply.and_then(|text| parse_test_cases(&text)) {
            Ok(content) => {
                info!(
                    provider = %generated_by.provider,
                    count = content.len(),
                    "Test cases drafted"
                );
                Drafted {
                    content,
                    generated_by,
                    used_fallback: false,
                }
            }
            Err(e) => {
                warn!(
                    provider = %generated_by.provider,
                    model = %generated_by.model,
                    error = %e,
                    "Test case generation failed, using fallback cases"
                );
                Drafted {
                    content: fallback_test_cases(&brief.title),
                    generated_by,
                    used_fallback: true,
                }
            }
        }
    }

    /// Resolve the provider, model and credential, then run one bounded call.
    async fn complete(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> (GeneratedBy, DraftResult<String>) {
        let provider_name = options
            .provider
            .clone()
            .unwrap_or_else(|| self.default_provider.as_str().to_string());
        let provider_id = ProviderId::parse(&provider_name);

        let model = match (&options.model, provider_id) {
            (Some(model), _) => model.clone(),
            (None, Some(id)) if id != self.default_provider => id.default_model().to_string(),
            (None, _) => self.default_model.clone(),
        };

        let generated_by = GeneratedBy {
            provider: provider_name.clone(),
            model: model.clone(),
        };

        let result: DraftResult<String> = async {
            let id = provider_id.ok_or_else(|| DraftError::UnsupportedProvider(provider_name.clone()))?;
            let provider = self
                .providers
                .get(&id)
                .ok_or_else(|| DraftError::UnsupportedProvider(provider_name.clone()))?;

            let api_key = options
                .api_key
                .as_deref()
                .filter(|k| !k.trim().is_empty())
                .or_else(|| self.credentials.get(id))
                .ok_or(DraftError::MissingCredential {
                    provider: id.display_name(),
                    env_var: id.api_key_env(),
                })?;

            tokio::time::timeout(self.request_timeout, provider.generate(prompt, &model, api_key))
                .await
                .map_err(|_| DraftError::Timeout(self.request_timeout.as_secs()))?
        }
        .await;

        (generated_by, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with fixed text (or an error) and records the calls it saw.
    struct ScriptedProvider {
        id: ProviderId,
        reply: Option<String>,
        delay: Duration,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedProvider {
        fn replying(id: ProviderId, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                id,
                reply: Some(reply.to_string()),
                delay: Duration::ZERO,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(id: ProviderId) -> Arc<Self> {
            Arc::new(Self {
                id,
                reply: None,
                delay: Duration::ZERO,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn slow(id: ProviderId, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                id,
                reply: Some("{}".to_string()),
                delay,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextProvider for ScriptedProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        async fn generate(&self, _prompt: &str, model: &str, api_key: &str) -> DraftResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), api_key.to_string()));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone().ok_or(DraftError::ProviderApi {
                provider: "scripted",
                message: "boom".to_string(),
                status_code: Some(500),
            })
        }
    }

    fn brief() -> RequirementBrief {
        RequirementBrief {
            title: "Bulk import".to_string(),
            description: "CSV upload".to_string(),
            bucket: "Feature".to_string(),
            squad: "Backend".to_string(),
        }
    }

    fn assembler(provider: Arc<ScriptedProvider>) -> DraftAssembler {
        let credentials = Credentials::default()
            .with(ProviderId::Gemini, "env-gemini")
            .with(ProviderId::OpenAi, "env-openai");
        DraftAssembler::new(AssemblerConfig::default(), credentials).with_provider(provider)
    }

    const VALID_PRD: &str = r#"Here it is {"overview": "Import CSV files", "userStories": ["story"],
        "uiDesign": "Upload dialog", "backendLogic": "Streaming parser",
        "diagrams": ["sequenceDiagram", "graph TD"], "solutionDelta": "Faster onboarding"}"#;

    #[tokio::test]
    async fn test_draft_prd_from_provider() {
        let provider = ScriptedProvider::replying(ProviderId::Gemini, VALID_PRD);
        let drafted = assembler(provider.clone())
            .draft_prd(&brief(), &GenerationOptions::default())
            .await;

        assert!(!drafted.used_fallback);
        assert_eq!(drafted.content.overview, "Import CSV files");
        assert_eq!(drafted.generated_by.provider, "gemini");
        assert_eq!(drafted.generated_by.model, "gemini-2.0-flash");

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("gemini-2.0-flash".to_string(), "env-gemini".to_string())]);
    }

    #[tokio::test]
    async fn test_garbage_reply_yields_fallback_prd() {
        let provider = ScriptedProvider::replying(ProviderId::Gemini, "I cannot help with that.");
        let drafted = assembler(provider)
            .draft_prd(&brief(), &GenerationOptions::default())
            .await;

        assert!(drafted.used_fallback);
        assert_eq!(drafted.content, fallback_prd("Bulk import"));
    }

    #[tokio::test]
    async fn test_provider_error_yields_fallback_prd() {
        let provider = ScriptedProvider::failing(ProviderId::Gemini);
        let drafted = assembler(provider)
            .draft_prd(&brief(), &GenerationOptions::default())
            .await;

        assert!(drafted.used_fallback);
        assert_eq!(drafted.content.diagrams.len(), 2);
    }

    #[tokio::test]
    async fn test_unsupported_provider_yields_fallback() {
        let provider = ScriptedProvider::replying(ProviderId::Gemini, VALID_PRD);
        let options = GenerationOptions {
            provider: Some("mistral".to_string()),
            ..Default::default()
        };
        let drafted = assembler(provider.clone()).draft_prd(&brief(), &options).await;

        assert!(drafted.used_fallback);
        assert_eq!(drafted.generated_by.provider, "mistral");
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_skips_call() {
        let provider = ScriptedProvider::replying(ProviderId::Anthropic, VALID_PRD);
        let options = GenerationOptions {
            provider: Some("anthropic".to_string()),
            ..Default::default()
        };
        let drafted = assembler(provider.clone()).draft_prd(&brief(), &options).await;

        assert!(drafted.used_fallback);
        assert_eq!(drafted.generated_by.model, "claude-instant-1");
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_key_overrides_environment() {
        let provider = ScriptedProvider::replying(ProviderId::OpenAi, VALID_PRD);
        let options = GenerationOptions {
            provider: Some("openai".to_string()),
            model: Some("gpt-4".to_string()),
            api_key: Some("caller-key".to_string()),
        };
        let drafted = assembler(provider.clone()).draft_prd(&brief(), &options).await;

        assert!(!drafted.used_fallback);
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("gpt-4".to_string(), "caller-key".to_string())]);
    }

    #[tokio::test]
    async fn test_timeout_yields_fallback() {
        let provider = ScriptedProvider::slow(ProviderId::Gemini, Duration::from_secs(5));
        let config = AssemblerConfig {
            request_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let assembler = DraftAssembler::new(
            config,
            Credentials::default().with(ProviderId::Gemini, "k"),
        )
        .with_provider(provider);

        let drafted = assembler
            .draft_test_cases(&brief(), None, &GenerationOptions::default())
            .await;
        assert!(drafted.used_fallback);
        assert_eq!(drafted.content, fallback_test_cases("Bulk import"));
    }

    #[tokio::test]
    async fn test_draft_test_cases_from_provider() {
        let reply = r#"{"testCases": [
            {"title": "Upload valid file", "description": "d", "preconditions": [],
             "steps": [{"stepNumber": 1, "action": "Upload", "expectedResult": "Imported"}]},
            {"title": "Upload empty file", "description": "d", "preconditions": [],
             "steps": []}
        ]}"#;
        let provider = ScriptedProvider::replying(ProviderId::Gemini, reply);
        let drafted = assembler(provider)
            .draft_test_cases(&brief(), None, &GenerationOptions::default())
            .await;

        assert!(!drafted.used_fallback);
        let titles: Vec<_> = drafted.content.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Upload valid file", "Upload empty file"]);
    }

    #[tokio::test]
    async fn test_empty_test_case_list_yields_fallback() {
        let provider = ScriptedProvider::replying(ProviderId::Gemini, r#"{"testCases": []}"#);
        let drafted = assembler(provider)
            .draft_test_cases(&brief(), None, &GenerationOptions::default())
            .await;

        assert!(drafted.used_fallback);
        assert_eq!(drafted.content.len(), 2);
    }

    #[tokio::test]
    async fn test_gemini_over_http() {
        use serde_json::json;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": VALID_PRD}]}}]
            })))
            .mount(&server)
            .await;

        let config = AssemblerConfig {
            gemini_base_url: server.uri(),
            ..Default::default()
        };
        let assembler = DraftAssembler::new(
            config,
            Credentials::default().with(ProviderId::Gemini, "k"),
        );

        let drafted = assembler
            .draft_prd(&brief(), &GenerationOptions::default())
            .await;
        assert!(!drafted.used_fallback);
        assert_eq!(drafted.content.backend_logic, "Streaming parser");
    }
}
