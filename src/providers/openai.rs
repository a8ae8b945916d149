use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, status_error, MAX_COMPLETION_TOKENS, TEMPERATURE};
use crate::provider::LlmProvider;
use crate::Error;

const PROVIDER: &str = "OpenAI";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions request body. This wire shape is shared by every backend
/// that speaks the OpenAI dialect (OpenAI, Ollama, Azure OpenAI).
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    /// Omitted for Azure, where the deployment in the URL selects the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Build the fixed system + user message pair for one generation.
    pub(crate) fn new(model: Option<String>, system_prompt: &str, user_message: &str) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_message.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_COMPLETION_TOKENS,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Unwrap the completion text from the response envelope.
    pub(crate) fn into_completion(self, provider: &'static str) -> Result<String, Error> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| Error::request_failed(provider, "response contained no completion"))
    }
}

/// OpenAI GPT provider implementation.
pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider. A missing API key is allowed and only
    /// surfaces through `is_configured()`.
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self, Error> {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if api_key.is_some() {
            debug!(model = %model, "OpenAI provider initialized");
        }
        Ok(Self {
            client: http_client()?,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (for proxies and tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, system_prompt: &str, user_message: &str) -> Result<String, Error> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            Error::unconfigured(PROVIDER, "set the OPENAI_API_KEY environment variable")
        })?;

        let body = ChatRequest::new(Some(self.model.clone()), system_prompt, user_message);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
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
