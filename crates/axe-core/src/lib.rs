//! Axe Core Library
//!
//! Shared functionality for the Axe behavioral spending analyzer:
//! - Get-started form state and submission gating
//! - HTTP client and state machine for the `/api/analyze` request
//! - Result rendering
//! - The analysis agent and its pluggable AI backends
//! - Prompt library with user overrides

pub mod agent;
pub mod ai;
pub mod client;
pub mod error;
pub mod flow;
pub mod form;
pub mod models;
pub mod prompts;
pub mod render;

/// Test utilities including mock analysis and chat servers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use agent::SpendingAgent;
pub use ai::{AIBackend, AIClient, MockBackend, OpenAICompatibleBackend};
pub use client::{AnalysisClient, AnalysisTransport};
pub use error::{Error, Result};
pub use flow::{AnalysisStatus, GetStartedFlow, SubmitOutcome};
pub use form::{Impulsiveness, SpendingInput};
pub use models::{AnalysisResult, AnalyzeRequest, ErrorBody, Recommendation};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use render::{render, ResultView};
