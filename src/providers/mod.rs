//! Provider implementations for the supported LLM backends.

pub mod anthropic;
pub mod azure;
pub mod ollama;
pub mod openai;

// Re-export commonly used provider types
pub use anthropic::AnthropicProvider;
pub use azure::AzureOpenAIProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;

use crate::Error;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// Sampling temperature used for every backend. Translation must be
/// deterministic, so this is pinned to the minimum.
pub(crate) const TEMPERATURE: f32 = 0.0;

/// Upper bound on completion length for every backend.
pub(crate) const MAX_COMPLETION_TOKENS: u32 = 2000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the HTTP client shared configuration for a provider.
pub(crate) fn http_client() -> Result<Client, Error> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Map a non-success response to the error taxonomy. HTTP 429 is distinguished
/// so callers can decide to back off; everything else is a request failure.
pub(crate) async fn status_error(provider: &'static str, response: Response) -> Error {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Error::rate_limited(provider);
    }
    let body = response.text().await.unwrap_or_default();
    Error::request_failed(provider, format!("API error ({status}): {body}"))
}
