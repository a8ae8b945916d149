use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, status_error, MAX_COMPLETION_TOKENS, TEMPERATURE};
use crate::provider::LlmProvider;
use crate::Error;

const PROVIDER: &str = "Anthropic";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Messages API request body. Anthropic takes the instructions in a separate
/// `system` field rather than as a message-list entry.
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Unwrap the completion text from the first text content block.
    fn into_completion(self) -> Result<String, Error> {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| Error::request_failed(PROVIDER, "response contained no completion"))
    }
}

/// Anthropic Claude provider implementation.
pub struct AnthropicProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider. A missing API key is allowed and only
    /// surfaces through `is_configured()`.
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self, Error> {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if api_key.is_some() {
            debug!(model = %model, "Anthropic provider initialized");
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
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, system_prompt: &str, user_message: &str) -> Result<String, Error> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            Error::unconfigured(PROVIDER, "set the ANTHROPIC_API_KEY environment variable")
        })?;

        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: TEMPERATURE,
            system: system_prompt.to_string(),
            messages: vec![AnthropicMessage {
                role: "user",
                content: user_message.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::request_failed(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(PROVIDER, response).await);
        }

        let messages: MessagesResponse = response
            .json()
            .await
            .map_err(|e| Error::request_failed(PROVIDER, format!("invalid response body: {e}")))?;
        messages.into_completion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation_without_key() {
        let provider = AnthropicProvider::new(None, None).unwrap();
        assert!(!provider.is_configured());
    }

    #[test]
    fn test_provider_creation_with_key() {
        let provider = AnthropicProvider::new(Some("test-key".to_string()), None).unwrap();
        assert!(provider.is_configured());
        assert_eq!(provider.model, "claude-3-5-sonnet-20241022");
    }

    #[test]
    fn test_completion_extraction_skips_non_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"thinking"},{"type":"text","text":" SELECT 1 "}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_completion().unwrap(), "SELECT 1");
    }

    #[test]
    fn test_empty_content_is_request_failure() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(matches!(
            response.into_completion(),
            Err(Error::RequestFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_without_key_is_unconfigured() {
        let provider = AnthropicProvider::new(None, None).unwrap();
        let result = provider.generate("system", "user").await;
        assert!(matches!(result, Err(Error::Unconfigured { .. })));
    }
}
