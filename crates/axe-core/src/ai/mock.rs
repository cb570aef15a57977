//! Mock backend for testing
//!
//! Returns canned completions for both agent steps. Useful for unit tests and
//! for running the analysis service without an LLM server.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

const REASON_RESPONSE: &str = r#"```json
{
  "underlying_reason": "You're using purchases as a quick reward to cope with stress because it feels like the one thing you control right now.",
  "triggers": ["Stress relief seeking", "Need for control", "Instant gratification"]
}
```"#;

const RECOMMENDATIONS_RESPONSE: &str = r#"[
  {"action": "Set a 48-hour rule: save items in your cart and wait two days before buying.", "why": "The dopamine spike fades, letting the deliberate part of your brain catch up."},
  {"action": "Write down what you were feeling right before each unplanned purchase.", "why": "Naming the emotion breaks the automatic cue-to-purchase loop."},
  {"action": "Replace the checkout habit with a five-minute walk.", "why": "Habit research shows swapping the routine works better than suppressing the urge."}
]"#;

/// Mock AI backend for testing
///
/// Tells the two agent steps apart by their system prompt: the
/// recommendations prompt is the one asking for `"why"` fields.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether complete() should fail
    pub failing: bool,
    /// Override for the underlying-reason step
    pub reason_response: Option<String>,
    /// Override for the recommendations step
    pub recommendations_response: Option<String>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Create a backend whose completions always fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
            ..Default::default()
        }
    }

    /// Create a backend with fixed replies for each step
    pub fn with_responses(reason: &str, recommendations: &str) -> Self {
        Self {
            healthy: true,
            failing: false,
            reason_response: Some(reason.to_string()),
            recommendations_response: Some(recommendations.to_string()),
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, system: &str, _user: &str) -> Result<String> {
        if self.failing {
            return Err(Error::InvalidData("Mock backend configured to fail".into()));
        }

        let response = if system.contains("\"why\"") {
            self.recommendations_response
                .as_deref()
                .unwrap_or(RECOMMENDATIONS_RESPONSE)
        } else {
            self.reason_response.as_deref().unwrap_or(REASON_RESPONSE)
        };
        Ok(response.to_string())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
