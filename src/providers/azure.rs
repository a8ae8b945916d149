use reqwest::Client;
use tracing::debug;

use super::openai::{ChatRequest, ChatResponse};
use super::{http_client, status_error};
use crate::provider::LlmProvider;
use crate::Error;

const PROVIDER: &str = "Azure OpenAI";
const DEFAULT_API_VERSION: &str = "2024-02-15-preview";

/// Azure OpenAI provider. Speaks the chat-completions wire shape against a
/// customer-specific endpoint; the deployment in the URL selects the model.
pub struct AzureOpenAIProvider {
    client: Client,
    api_key: Option<String>,
    endpoint: Option<String>,
    deployment: Option<String>,
    api_version: String,
}

impl AzureOpenAIProvider {
    /// Create a new Azure OpenAI provider. Missing credentials or endpoint
    /// data are allowed and only surface through `is_configured()`.
    pub fn new(
        api_key: Option<String>,
        endpoint: Option<String>,
        deployment: Option<String>,
        api_version: Option<String>,
    ) -> Result<Self, Error> {
        let api_version = api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        if api_key.is_some() && endpoint.is_some() {
            debug!(deployment = ?deployment, "Azure OpenAI provider initialized");
        }
        Ok(Self {
            client: http_client()?,
            api_key,
            endpoint,
            deployment,
            api_version,
        })
    }

    fn credentials(&self) -> Result<(&str, &str, &str), Error> {
        match (&self.api_key, &self.endpoint, &self.deployment) {
            (Some(key), Some(endpoint), Some(deployment)) => Ok((key, endpoint, deployment)),
            _ => Err(Error::unconfigured(
                PROVIDER,
                "set the AZURE_OPENAI_API_KEY, AZURE_OPENAI_ENDPOINT, and \
                 AZURE_OPENAI_DEPLOYMENT environment variables",
            )),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for AzureOpenAIProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.endpoint.is_some() && self.deployment.is_some()
    }

    async fn generate(&self, system_prompt: &str, user_message: &str) -> Result<String, Error> {
        let (api_key, endpoint, deployment) = self.credentials()?;

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            self.api_version
        );
        let body = ChatRequest::new(None, system_prompt, user_message);

        let response = self
            .client
            .post(url)
            .header("api-key", api_key)
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
