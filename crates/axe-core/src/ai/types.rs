//! AI backend response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

/// First agent step: the psychology behind a purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonAnalysis {
    /// One sentence naming the deeper need the purchase served
    #[serde(default)]
    pub underlying_reason: String,
    /// Short trigger labels ("FOMO", "Stress relief seeking", ...)
    #[serde(default)]
    pub triggers: Vec<String>,
}
