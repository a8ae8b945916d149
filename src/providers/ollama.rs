use reqwest::Client;
use tracing::debug;

use super::openai::{ChatRequest, ChatResponse};
use super::{http_client, status_error};
use crate::provider::LlmProvider;
use crate::Error;

const PROVIDER: &str = "Ollama";
const DEFAULT_MODEL: &str = "llama3.1";
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama local LLM provider. Reuses the OpenAI chat-completions wire shape
/// through Ollama's compatibility endpoint and requires no credential.
pub struct OllamaProvider {
    client: Client,
    model: String,
    base_url: String,
}

impl OllamaProvider {
    pub fn new(model: Option<String>, base_url: Option<String>) -> Result<Self, Error> {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        debug!(model = %model, base_url = %base_url, "Ollama provider initialized");
        Ok(Self {
            client: http_client()?,
            model,
            base_url,
        })
    }
}

#[async_trait::async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    /// A local daemon needs no credential, so an instance is always
    /// configured; an unreachable daemon surfaces as a request failure.
    fn is_configured(&self) -> bool {
        true
    }

    async fn generate(&self, system_prompt: &str, user_message: &str) -> Result<String, Error> {
        let body = ChatRequest::new(Some(self.model.clone()), system_prompt, user_message);

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::request_failed(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(PROVIDER, response).await);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::request_failed(PROVIDER, format!("invalid response body: {e}")))?;
        chat.into_completion(PROVIDER)
    }
}
