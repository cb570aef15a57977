//! Pluggable AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the analysis agent's
//! LLM calls.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (openai_compatible, openrouter, mock). Default: openai_compatible
//! - `OPENAI_COMPATIBLE_HOST` / `OPENAI_COMPATIBLE_MODEL` / `OPENAI_COMPATIBLE_API_KEY`
//! - `OPENROUTER_API_KEY` / `MODEL_NAME` (openrouter backend)

mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::MockBackend;
pub use openai_compatible::{OpenAICompatibleBackend, OPENROUTER_HOST};
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Run one chat completion with a system and a user message
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI-compatible backend (OpenRouter, vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `openai_compatible` (default): Uses OPENAI_COMPATIBLE_HOST and OPENAI_COMPATIBLE_MODEL
    /// - `openrouter`: Uses OPENROUTER_API_KEY and MODEL_NAME
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend =
            std::env::var("AI_BACKEND").unwrap_or_else(|_| "openai_compatible".to_string());

        match backend.to_lowercase().as_str() {
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            "openrouter" => {
                OpenAICompatibleBackend::openrouter_from_env().map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to openai_compatible");
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.complete(system, user).await,
            AIClient::Mock(b) => b.complete(system, user).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
