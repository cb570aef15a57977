//! Impulsive spending analysis agent
//!
//! Two sequential LLM steps:
//! 1. `analyze_reason`: the psychological need behind the purchase plus 2-3
//!    behavioral triggers
//! 2. `generate_recommendations`: 3-4 research-backed techniques aimed at
//!    that reason
//!
//! Model output that cannot be parsed never fails the analysis; each step has
//! a fixed fallback. Transport errors from the backend do propagate.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::ai::parsing::{parse_reason_analysis, parse_recommendations};
use crate::ai::{AIBackend, AIClient, ReasonAnalysis};
use crate::error::{Error, Result};
use crate::models::{AnalysisResult, AnalyzeRequest, Recommendation};
use crate::prompts::{PromptId, PromptLibrary};

/// Upper bound on trigger labels returned to the user
pub const MAX_TRIGGERS: usize = 3;

const FALLBACK_REASON: &str =
    "You might be spending to fill an emotional need - let's look deeper at this pattern.";
const FALLBACK_TRIGGERS: [&str; 2] = ["Emotional spending", "Impulse control"];

fn fallback_reason() -> ReasonAnalysis {
    ReasonAnalysis {
        underlying_reason: FALLBACK_REASON.to_string(),
        triggers: FALLBACK_TRIGGERS.iter().map(|t| t.to_string()).collect(),
    }
}

fn fallback_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation::new(
            "Set a 24-hour wait rule before purchases",
            "Gives your rational brain time to catch up",
        ),
        Recommendation::new(
            "Track what triggers your spending urges",
            "Awareness is the first step to change",
        ),
        Recommendation::new(
            "Find a healthier dopamine source",
            "Address the need without spending",
        ),
    ]
}

/// Runs the analysis pipeline against an AI backend
#[derive(Clone)]
pub struct SpendingAgent {
    backend: AIClient,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl SpendingAgent {
    /// Create an agent using the default prompt library (with user overrides)
    pub fn new(backend: AIClient) -> Self {
        Self::with_prompts(backend, PromptLibrary::new())
    }

    pub fn with_prompts(backend: AIClient, prompts: PromptLibrary) -> Self {
        Self {
            backend,
            prompts: Arc::new(RwLock::new(prompts)),
        }
    }

    /// Create from environment variables (see [`AIClient::from_env`])
    pub fn from_env() -> Option<Self> {
        AIClient::from_env().map(Self::new)
    }

    pub fn backend(&self) -> &AIClient {
        &self.backend
    }

    /// Render both sections of a prompt
    fn render(&self, id: PromptId, vars: &HashMap<&str, &str>) -> Result<(String, String)> {
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::Prompt("Failed to acquire prompt library lock".into()))?;
        let prompt = prompts.get(id)?;
        Ok((prompt.render_system(vars)?, prompt.render_user(vars)?))
    }

    /// Analyze one impulsive purchase
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult> {
        info!(
            amount = request.actual_spent,
            category = %request.spending_category,
            model = self.backend.model(),
            "Analyzing spending"
        );

        let reason = self.analyze_reason(request).await?;
        let recommendations = self.generate_recommendations(request, &reason).await?;

        Ok(AnalysisResult {
            underlying_reason: reason.underlying_reason,
            behavioral_triggers: reason.triggers,
            recommendations,
            spending_reason: request.spending_reason.clone(),
            actual_spent: request.actual_spent,
            category: request.spending_category.clone(),
        })
    }

    async fn analyze_reason(&self, request: &AnalyzeRequest) -> Result<ReasonAnalysis> {
        let amount = request.actual_spent.to_string();
        let mut vars = HashMap::new();
        vars.insert("amount", amount.as_str());
        vars.insert("reason", request.spending_reason.as_str());
        vars.insert("category", request.spending_category.as_str());

        let (system, user) = self.render(PromptId::AnalyzeReason, &vars)?;
        let response = self.backend.complete(&system, &user).await?;
        debug!("Reason step response: {}", response);

        let mut analysis = match parse_reason_analysis(&response) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, "Could not parse reason analysis, using fallback");
                fallback_reason()
            }
        };
        analysis.triggers.retain(|t| !t.trim().is_empty());
        analysis.triggers.truncate(MAX_TRIGGERS);
        Ok(analysis)
    }

    async fn generate_recommendations(
        &self,
        request: &AnalyzeRequest,
        reason: &ReasonAnalysis,
    ) -> Result<Vec<Recommendation>> {
        let triggers = reason.triggers.join(", ");
        let mut vars = HashMap::new();
        vars.insert("underlying_reason", reason.underlying_reason.as_str());
        vars.insert("triggers", triggers.as_str());
        vars.insert("reason", request.spending_reason.as_str());

        let (system, user) = self.render(PromptId::GenerateRecommendations, &vars)?;
        let response = self.backend.complete(&system, &user).await?;
        debug!("Recommendations step response: {}", response);

        match parse_recommendations(&response) {
            Ok(recs) if !recs.is_empty() => Ok(recs),
            Ok(_) => {
                warn!("Model returned no recommendations, using fallback");
                Ok(fallback_recommendations())
            }
            Err(e) => {
                warn!(error = %e, "Could not parse recommendations, using fallback");
                Ok(fallback_recommendations())
            }
        }
    }
}
