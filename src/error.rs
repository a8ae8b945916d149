use thiserror::Error;

/// Errors that can occur when using the eurostat-llm library.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} provider is not configured: {message}")]
    Unconfigured {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} request failed: {message}")]
    RequestFailed {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} rate limit exceeded")]
    RateLimited { provider: &'static str },

    #[error("Unknown provider kind '{requested}'. Known kinds: {known}")]
    UnknownProviderKind { requested: String, known: String },

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("{provider} provider is not configured; cannot translate natural language questions")]
    ProviderUnavailable { provider: &'static str },

    #[error("Failed to translate question: {0}")]
    TranslationFailed(#[source] Box<Error>),

    #[error("Model output is not an allowed SQL statement: {statement:?}")]
    UnsafeTranslation { statement: String },
}

impl Error {
    pub fn unconfigured(provider: &'static str, message: impl Into<String>) -> Self {
        Error::Unconfigured {
            provider,
            message: message.into(),
        }
    }

    pub fn request_failed(provider: &'static str, message: impl Into<String>) -> Self {
        Error::RequestFailed {
            provider,
            message: message.into(),
        }
    }

    pub fn rate_limited(provider: &'static str) -> Self {
        Error::RateLimited { provider }
    }
}
