use drafting::providers::{DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_GEMINI_BASE_URL, DEFAULT_OPENAI_BASE_URL};
use drafting::{AssemblerConfig, ProviderId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "pm-studio.toml";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:pm-studio.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Insert the sample backlog into an empty database on startup.
    pub seed_sample_data: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            seed_sample_data: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSection {
    pub default_provider: ProviderId,
    pub default_model: String,
    pub request_timeout_secs: u64,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub gemini_base_url: String,
}

impl Default for AiSection {
    fn default() -> Self {
        Self {
            default_provider: ProviderId::Gemini,
            default_model: ProviderId::Gemini.default_model().to_string(),
            request_timeout_secs: 60,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

/// Settings read from `pm-studio.toml`. Credentials are not stored here; each
/// provider's key comes from its own environment variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub ai: AiSection,
}

impl ServerConfig {
    /// Read the config file, falling back to defaults when it is missing or
    /// unreadable, then apply `PORT` and `DATABASE_URL` from the environment.
    pub async fn load(path: &Path) -> Self {
        Self::read(path).await.with_overrides(
            std::env::var("PORT").ok(),
            std::env::var("DATABASE_URL").ok(),
        )
    }

    pub async fn read(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "Config file does not exist, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path).await {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    debug!(path = %path.display(), "Config loaded successfully");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                Self::default()
            }
        }
    }

    pub fn with_overrides(mut self, port: Option<String>, database_url: Option<String>) -> Self {
        if let Some(port) = port {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %port, "Ignoring invalid PORT"),
            }
        }
        if let Some(url) = database_url.filter(|u| !u.trim().is_empty()) {
            self.server.database_url = url;
        }
        self
    }

    pub async fn write(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(path, content).await?;
        debug!(path = %path.display(), "Config saved successfully");

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig {
            default_provider: self.ai.default_provider,
            default_model: self.ai.default_model.clone(),
            request_timeout: Duration::from_secs(self.ai.request_timeout_secs),
            openai_base_url: self.ai.openai_base_url.clone(),
            anthropic_base_url: self.ai.anthropic_base_url.clone(),
            gemini_base_url: self.ai.gemini_base_url.clone(),
        }
    }
}
