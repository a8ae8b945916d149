//! A unified abstraction over multiple LLM providers.
//!
//! This library translates natural language questions about Eurostat
//! statistical data into executable DuckDB SQL, with a consistent API over
//! Anthropic, OpenAI, Ollama, and Azure OpenAI backends. Raw model output is
//! sanitized and validated against a read-only statement allow-list before it
//! is ever handed back to the caller.

pub mod error;
pub mod factory;
pub mod provider;
pub mod providers;
pub mod translator;

// Re-export core types for easy usage
pub use error::Error;
pub use factory::{ProviderFactory, ProviderKind, ProviderParams};
pub use provider::LlmProvider;
pub use providers::*;
pub use translator::QueryTranslator;
