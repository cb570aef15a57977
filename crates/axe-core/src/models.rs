//! Wire types for the `/api/analyze` endpoint
//!
//! These are shared by the client (`client`, `flow`) and the service
//! (`agent`, axe-server), so both sides agree on field names.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Category sent with every analysis request from the get-started flow
pub const DEFAULT_CATEGORY: &str = "general";

/// Request body for `POST /api/analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub actual_spent: f64,
    pub spending_reason: String,
    #[serde(default = "default_category")]
    pub spending_category: String,
}

impl AnalyzeRequest {
    /// Build a request in the default category
    pub fn new(actual_spent: f64, spending_reason: impl Into<String>) -> Self {
        Self {
            actual_spent,
            spending_reason: spending_reason.into(),
            spending_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// An actionable technique paired with the psychology behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub action: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub why: String,
}

impl Recommendation {
    pub fn new(action: impl Into<String>, why: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            why: why.into(),
        }
    }
}

/// Behavioral feedback returned by a successful analysis
///
/// Every field is defaulted and read leniently: a sparse or oddly typed body
/// still produces a result, and unreadable values render as empty (or `NaN`
/// for the amount).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub underlying_reason: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub behavioral_triggers: Vec<String>,
    #[serde(default, deserialize_with = "lenient_recommendations")]
    pub recommendations: Vec<Recommendation>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub spending_reason: String,
    #[serde(default = "missing_amount", deserialize_with = "lenient_amount")]
    pub actual_spent: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
}

fn missing_amount() -> f64 {
    f64::NAN
}

/// Scalars as text; anything else is `None`
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    })
}

/// Objects become rows; a bare string becomes an action without a `why`
fn lenient_recommendations<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Recommendation>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).ok(),
            other => scalar_text(other).map(|action| Recommendation::new(action, "")),
        })
        .collect())
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

/// Body of a non-success response from `/api/analyze`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
