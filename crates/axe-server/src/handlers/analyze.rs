//! Spending analysis handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use axe_core::ai::AIBackend;
use axe_core::models::{AnalysisResult, AnalyzeRequest, DEFAULT_CATEGORY};

use crate::{AppError, AppState};

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub available: bool,
}

/// POST /api/analyze - Analyze one impulsive purchase
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, AppError> {
    let request = parse_analyze_request(&body)?;

    let agent = state
        .agent
        .as_ref()
        .ok_or_else(|| AppError::unavailable("Analysis backend not configured"))?;

    let result = agent
        .analyze(&request)
        .await
        .map_err(AppError::analysis_failed)?;

    info!(
        triggers = result.behavioral_triggers.len(),
        recommendations = result.recommendations.len(),
        "Analysis complete"
    );

    Ok(Json(result))
}

/// GET /api/health - AI backend status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    match state.agent.as_ref() {
        Some(agent) => {
            let backend = agent.backend();
            let available = backend.health_check().await;
            Json(HealthResponse {
                status: if available { "ok" } else { "degraded" },
                backend: Some(backend.host().to_string()),
                model: Some(backend.model().to_string()),
                available,
            })
        }
        None => Json(HealthResponse {
            status: "unconfigured",
            backend: None,
            model: None,
            available: false,
        }),
    }
}

/// Validate the raw body into an [`AnalyzeRequest`]
///
/// `actual_spent` may arrive as a number or a numeric string.
fn parse_analyze_request(body: &[u8]) -> Result<AnalyzeRequest, AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| AppError::bad_request("Request body must be JSON"))?;

    let (Some(amount), Some(reason)) = (value.get("actual_spent"), value.get("spending_reason"))
    else {
        return Err(AppError::bad_request("Missing required fields"));
    };

    let actual_spent = match amount {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
    .ok_or_else(|| AppError::bad_request("actual_spent must be a number"))?;

    let spending_reason = reason
        .as_str()
        .ok_or_else(|| AppError::bad_request("spending_reason must be a string"))?
        .to_string();

    let spending_category = value
        .get("spending_category")
        .and_then(|c| c.as_str())
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();

    Ok(AnalyzeRequest {
        actual_spent,
        spending_reason,
        spending_category,
    })
}
