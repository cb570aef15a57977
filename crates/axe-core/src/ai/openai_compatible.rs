//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - OpenRouter (https://openrouter.ai/api)
//! - vLLM (http://localhost:8000)
//! - LocalAI (http://localhost:8080)
//! - llama-server / llama.cpp (http://localhost:8080)
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)
//!
//! For OpenRouter:
//! - `OPENROUTER_API_KEY`: API key (required)
//! - `MODEL_NAME`: Model name (default: google/gemini-flash-1.5)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::AIBackend;

/// OpenRouter's OpenAI-compatible base URL
pub const OPENROUTER_HOST: &str = "https://openrouter.ai/api";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-flash-1.5";

/// Sampling temperature for analysis; the answers are meant to be personal,
/// not deterministic
const TEMPERATURE: f32 = 0.7;

/// OpenAI-compatible backend
///
/// Works with any server implementing the OpenAI `/v1/chat/completions` API.
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    /// Extra headers sent with every request (OpenRouter attribution)
    extra_headers: Vec<(String, String)>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            extra_headers: Vec::new(),
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        let mut backend = Self::new(base_url, model);
        backend.api_key = Some(api_key.to_string());
        backend
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers
            .push((name.to_string(), value.to_string()));
        self
    }

    /// Create from environment variables
    ///
    /// Required: `OPENAI_COMPATIBLE_HOST`
    /// Optional: `OPENAI_COMPATIBLE_MODEL` (default: gpt-4o-mini)
    /// Optional: `OPENAI_COMPATIBLE_API_KEY`
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OPENAI_COMPATIBLE_HOST").ok()?;
        let model =
            std::env::var("OPENAI_COMPATIBLE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_key = std::env::var("OPENAI_COMPATIBLE_API_KEY").ok();

        let mut backend = Self::new(&host, &model);
        backend.api_key = api_key;
        Some(backend)
    }

    /// Create an OpenRouter backend from environment variables
    ///
    /// Required: `OPENROUTER_API_KEY`
    /// Optional: `MODEL_NAME`
    pub fn openrouter_from_env() -> Option<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY").ok()?;
        let model =
            std::env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_OPENROUTER_MODEL.to_string());

        Some(
            Self::with_api_key(OPENROUTER_HOST, &model, &api_key)
                .with_header("HTTP-Referer", "https://axe-budget.app")
                .with_header("X-Title", "Axe Behavioral Spending Analyzer"),
        )
    }

    /// Make a chat completion request
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(TEMPERATURE),
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }
        for (name, value) in &self.extra_headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::InvalidData("No response from OpenAI API".into()))
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let response = self.chat_completion(system, user).await?;
        debug!("OpenAI-compatible response: {}", response);
        Ok(response)
    }

    async fn health_check(&self) -> bool {
        let mut req_builder = self
            .http_client
            .get(format!("{}/v1/models", self.base_url));

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        match req_builder.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockChatServer;

    #[test]
    fn test_backend_new() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8080", "test-model");
        assert_eq!(backend.host(), "http://localhost:8080");
        assert_eq!(backend.model(), "test-model");
        assert!(backend.api_key.is_none());
    }

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8080/", "m");
        assert_eq!(backend.host(), "http://localhost:8080");
    }

    #[test]
    fn test_backend_with_api_key_and_headers() {
        let backend = OpenAICompatibleBackend::with_api_key(OPENROUTER_HOST, "m", "sk-test")
            .with_header("X-Title", "Axe");
        assert_eq!(backend.api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            backend.extra_headers,
            vec![("X-Title".to_string(), "Axe".to_string())]
        );
    }

    #[test]
    fn test_chat_completion_request_serialization() {
        let request = ChatCompletionRequest {
            model: "m".into(),
            messages: vec![ChatMessage {
                role: "system".into(),
                content: "be kind".into(),
            }],
            temperature: Some(TEMPERATURE),
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["stream"], false);
        assert!(json["temperature"].as_f64().unwrap() > 0.69);
    }

    #[test]
    fn test_chat_completion_response_deserialization() {
        let json = r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "hi"}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "hi");
    }

    #[tokio::test]
    async fn test_complete_against_mock_server() {
        let server = MockChatServer::start(vec!["{\"ok\": true}".to_string()]).await;
        let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "m", "sk-test");

        let reply = backend.complete("system", "user").await.unwrap();
        assert_eq!(reply, "{\"ok\": true}");
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = OpenAICompatibleBackend::new("http://127.0.0.1:1", "m");
        assert!(!backend.health_check().await);
    }
}
