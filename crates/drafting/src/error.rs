use thiserror::Error;

/// Errors raised while talking to a provider or reading its reply.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("{provider} API error: {message}")]
    ProviderApi {
        provider: &'static str,
        message: String,
        status_code: Option<u16>,
    },

    #[error("Unsupported AI provider: {0}")]
    UnsupportedProvider(String),

    #[error("No credential configured for {provider} (set {env_var})")]
    MissingCredential {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("Unsupported model name: {0}")]
    InvalidModel(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("No JSON object found in provider response")]
    NoJsonFound,

    #[error("Invalid JSON in provider response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Provider response contained no {0}")]
    EmptyResponse(&'static str),

    #[error("Provider did not answer within {0}s")]
    Timeout(u64),
}

/// Request URLs may carry credentials, so they are dropped from the error.
impl From<reqwest::Error> for DraftError {
    fn from(err: reqwest::Error) -> Self {
        DraftError::Http(err.without_url())
    }
}

pub type DraftResult<T> = Result<T, DraftError>;
