use crate::Error;

/// A trait for LLM providers that can generate text completions.
///
/// Each implementation maps the two-argument contract onto its backend's wire
/// shape and returns the bare completion text, with any response envelope
/// (choices, content blocks, usage data) already stripped.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync + 'static {
    /// Backend identifier used in errors and logs.
    fn name(&self) -> &'static str;

    /// Whether the instance holds enough credential/endpoint data to attempt
    /// a call. Pure, performs no I/O.
    fn is_configured(&self) -> bool;

    /// Send one request to the backend and return its textual completion.
    ///
    /// Performs exactly one outbound request, no retries. Fails with
    /// [`Error::Unconfigured`] when called on an unconfigured instance,
    /// [`Error::RateLimited`] when the backend signals quota exhaustion, and
    /// [`Error::RequestFailed`] for every other transport or API failure.
    async fn generate(&self, system_prompt: &str, user_message: &str) -> Result<String, Error>;
}
