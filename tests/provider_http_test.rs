use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eurostat_llm::{
    AnthropicProvider, AzureOpenAIProvider, Error, LlmProvider, OllamaProvider, OpenAIProvider,
    ProviderFactory, ProviderParams, QueryTranslator,
};

fn anthropic_at(server: &MockServer) -> AnthropicProvider {
    AnthropicProvider::new(Some("test-key".to_string()), None)
        .unwrap()
        .with_base_url(server.uri())
}

fn openai_at(server: &MockServer) -> OpenAIProvider {
    OpenAIProvider::new(Some("test-key".to_string()), None)
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn test_anthropic_request_shape_and_completion_unwrapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 2000,
            "temperature": 0.0,
            "system": "system prompt",
            "messages": [{"role": "user", "content": "user message"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "SELECT * FROM test"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = anthropic_at(&server)
        .generate("system prompt", "user message")
        .await
        .unwrap();
    assert_eq!(completion, "SELECT * FROM test");
}

#[tokio::test]
async fn test_anthropic_rate_limit_is_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = anthropic_at(&server).generate("system", "user").await;
    assert!(matches!(result, Err(Error::RateLimited { .. })));
}

#[tokio::test]
async fn test_openai_request_shape_and_completion_unwrapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "temperature": 0.0,
            "max_tokens": 2000,
            "messages": [
                {"role": "system", "content": "system prompt"},
                {"role": "user", "content": "user message"},
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "SELECT * FROM test"}}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = openai_at(&server)
        .generate("system prompt", "user message")
        .await
        .unwrap();
    assert_eq!(completion, "SELECT * FROM test");
}

#[tokio::test]
async fn test_openai_server_error_is_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = openai_at(&server)
        .generate("system", "user")
        .await
        .expect_err("must fail");
    match &err {
        Error::RequestFailed { provider, message } => {
            assert_eq!(*provider, "OpenAI");
            assert!(message.contains("500"));
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_empty_choices_is_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let result = openai_at(&server).generate("system", "user").await;
    assert!(matches!(result, Err(Error::RequestFailed { .. })));
}

#[tokio::test]
async fn test_unreachable_backend_is_request_failure() {
    // nothing listens on port 1; the connection is refused immediately
    let provider = OpenAIProvider::new(Some("test-key".to_string()), None)
        .unwrap()
        .with_base_url("http://127.0.0.1:1");

    let result = provider.generate("system", "user").await;
    assert!(matches!(result, Err(Error::RequestFailed { .. })));
}

#[tokio::test]
async fn test_ollama_uses_compatibility_endpoint_without_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": "llama3.1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "SELECT * FROM test"}}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(None, Some(server.uri())).unwrap();
    assert!(provider.is_configured());

    let completion = provider.generate("system", "user").await.unwrap();
    assert_eq!(completion, "SELECT * FROM test");
}

#[tokio::test]
async fn test_azure_addresses_deployment_with_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/test-deployment/chat/completions"))
        .and(query_param("api-version", "2024-02-15-preview"))
        .and(header("api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "SELECT * FROM test"}}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = AzureOpenAIProvider::new(
        Some("test-key".to_string()),
        Some(server.uri()),
        Some("test-deployment".to_string()),
        None,
    )
    .unwrap();

    let completion = provider.generate("system", "user").await.unwrap();
    assert_eq!(completion, "SELECT * FROM test");
}

#[tokio::test]
async fn test_translator_end_to_end_through_factory_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "```sql\nSELECT * FROM EUROSTAT_Endpoints();\n```"}}],
        })))
        .mount(&server)
        .await;

    let provider = ProviderFactory::create(
        "openai",
        ProviderParams {
            api_key: Some("test-key".to_string()),
            base_url: Some(server.uri()),
            ..Default::default()
        },
    )
    .unwrap();

    let translator = QueryTranslator::new(provider);
    let sql = translator.translate("list providers").await.unwrap();
    assert_eq!(sql, "SELECT * FROM EUROSTAT_Endpoints()");
}
