use std::fmt;
use std::str::FromStr;

use crate::providers::{AnthropicProvider, AzureOpenAIProvider, OllamaProvider, OpenAIProvider};
use crate::{Error, LlmProvider};

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Anthropic,
    OpenAI,
    Ollama,
    AzureOpenAI,
}

impl ProviderKind {
    /// Every kind the factory can construct, in the order they are listed in
    /// [`Error::UnknownProviderKind`] messages.
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Anthropic,
        ProviderKind::OpenAI,
        ProviderKind::Ollama,
        ProviderKind::AzureOpenAI,
    ];

    /// The identifier this kind is registered under.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Ollama => "ollama",
            ProviderKind::AzureOpenAI => "azure",
        }
    }

    fn known_kinds() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "openai" => Ok(ProviderKind::OpenAI),
            "ollama" => Ok(ProviderKind::Ollama),
            "azure" => Ok(ProviderKind::AzureOpenAI),
            _ => Err(Error::UnknownProviderKind {
                requested: s.to_string(),
                known: Self::known_kinds(),
            }),
        }
    }
}

/// Named construction parameters for a provider.
///
/// Every field is optional: a missing credential never fails construction and
/// only surfaces later through `is_configured()`, so a server can start with
/// some backends unusable. Which fields a backend reads is its own business.
#[derive(Debug, Clone, Default)]
pub struct ProviderParams {
    /// API key / secret (Anthropic, OpenAI, Azure). Ignored by Ollama.
    pub api_key: Option<String>,
    /// Model identifier override (Anthropic, OpenAI, Ollama).
    pub model: Option<String>,
    /// API base URL override (OpenAI-style backends and the Ollama daemon).
    pub base_url: Option<String>,
    /// Resource endpoint (Azure).
    pub endpoint: Option<String>,
    /// Deployment name (Azure).
    pub deployment: Option<String>,
    /// API version override (Azure).
    pub api_version: Option<String>,
}

/// Factory for creating LLM providers.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider from a backend identifier and construction
    /// parameters. Unknown identifiers fail with the list of known ones.
    pub fn create(kind: &str, params: ProviderParams) -> Result<Box<dyn LlmProvider>, Error> {
        Self::create_kind(kind.parse()?, params)
    }

    /// Create a provider from an already-resolved kind.
    pub fn create_kind(
        kind: ProviderKind,
        params: ProviderParams,
    ) -> Result<Box<dyn LlmProvider>, Error> {
        match kind {
            ProviderKind::Anthropic => {
                let mut provider = AnthropicProvider::new(params.api_key, params.model)?;
                if let Some(base_url) = params.base_url {
                    provider = provider.with_base_url(base_url);
                }
                Ok(Box::new(provider))
            }
            ProviderKind::OpenAI => {
                let mut provider = OpenAIProvider::new(params.api_key, params.model)?;
                if let Some(base_url) = params.base_url {
                    provider = provider.with_base_url(base_url);
                }
                Ok(Box::new(provider))
            }
            ProviderKind::Ollama => {
                Ok(Box::new(OllamaProvider::new(params.model, params.base_url)?))
            }
            ProviderKind::AzureOpenAI => Ok(Box::new(AzureOpenAIProvider::new(
                params.api_key,
                params.endpoint,
                params.deployment,
                params.api_version,
            )?)),
        }
    }
}
