//! Axe Web Server
//!
//! Axum-based HTTP service hosting the `/api/analyze` endpoint that the
//! get-started flow posts to.
//!
//! - `POST /api/analyze`: run the spending analysis agent
//! - `GET /api/health`: AI backend status
//! - Optional static file serving for the marketing pages

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use axe_core::ai::AIBackend;
use axe_core::SpendingAgent;

mod handlers;

/// Maximum accepted request body (the form has three short fields)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read `AXE_ALLOWED_ORIGINS` (comma-separated)
    pub fn from_env() -> Self {
        Self {
            allowed_origins: parse_origins(&std::env::var("AXE_ALLOWED_ORIGINS").unwrap_or_default()),
        }
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Shared application state
pub struct AppState {
    /// Analysis agent (None when no AI backend is configured)
    pub agent: Option<SpendingAgent>,
}

/// Create the application router
pub fn create_router(
    agent: Option<SpendingAgent>,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    if let Some(ref agent) = agent {
        info!(
            "AI backend configured: {} (model: {})",
            agent.backend().host(),
            agent.backend().model()
        );
    } else {
        info!("ℹ️  AI backend not configured (set AI_BACKEND and its host/key variables)");
    }

    let state = Arc::new(AppState { agent });

    let api_routes = Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/health", get(handlers::health));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);
    let cors = if config.allowed_origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with an agent built from the environment
pub async fn serve(host: &str, port: u16, static_dir: Option<&str>) -> anyhow::Result<()> {
    serve_with_config(host, port, static_dir, ServerConfig::from_env()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let agent = SpendingAgent::from_env();
    check_ai_connection(agent.as_ref()).await;

    let app = create_router(agent, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection(agent: Option<&SpendingAgent>) {
    match agent {
        Some(agent) => {
            let backend = agent.backend();
            if backend.health_check().await {
                info!(
                    "✅ AI backend connected: {} (model: {})",
                    backend.host(),
                    backend.model()
                );
            } else {
                warn!(
                    "⚠️  AI backend configured but not responding: {} (model: {})",
                    backend.host(),
                    backend.model()
                );
            }
        }
        None => {
            warn!("⚠️  No AI backend configured; /api/analyze will answer 503");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
///
/// Serializes as `{"detail": ..., "error": ...}`; clients show `detail`.
pub struct AppError {
    status: StatusCode,
    detail: String,
    error: Option<String>,
    internal: Option<anyhow::Error>,
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    detail: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: msg.to_string(),
            error: None,
            internal: None,
        }
    }

    pub fn unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: msg.to_string(),
            error: None,
            internal: None,
        }
    }

    /// The agent or its backend failed; the cause is echoed in `error`
    pub fn analysis_failed(err: axe_core::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "Error analyzing spending".to_string(),
            error: Some(err.to_string()),
            internal: Some(err.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(ErrorResponse {
            detail: &self.detail,
            error: self.error.as_deref(),
        });

        (self.status, body).into_response()
    }
}
