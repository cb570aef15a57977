//! Analysis Request Client
//!
//! Posts an [`AnalyzeRequest`] to `{base_url}/api/analyze` and maps the reply
//! into an [`AnalysisResult`] or an [`Error::Rejected`] carrying the server's
//! `detail` message.
//!
//! # Configuration
//!
//! Environment variables:
//! - `AXE_API_URL`: Base URL of the analysis service (default: http://127.0.0.1:3000)

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{AnalysisResult, AnalyzeRequest, ErrorBody};

/// Default analysis service location (the `axe serve` default bind)
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Path of the analysis endpoint relative to the base URL
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Something that can turn an analysis request into a result
///
/// The get-started flow only depends on this trait, so it can run against the
/// HTTP client or an in-memory double.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult>;
}

/// HTTP client for the analysis service
#[derive(Clone)]
pub struct AnalysisClient {
    http_client: Client,
    base_url: String,
}

impl AnalysisClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from `AXE_API_URL`, falling back to the local default
    pub fn from_env() -> Self {
        let base_url = std::env::var("AXE_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the analysis endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_PATH)
    }
}

#[async_trait]
impl AnalysisTransport for AnalysisClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult> {
        let url = self.endpoint();
        debug!(url = %url, amount = request.actual_spent, "Sending analysis request");

        let response = self.http_client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail);
            warn!(status = %status, detail = ?detail, "Analysis request rejected");
            return Err(Error::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response.bytes().await?;
        let result: AnalysisResult = serde_json::from_slice(&bytes)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockAnalysisServer, MockReply};

    #[test]
    fn test_client_new_trims_trailing_slash() {
        let client = AnalysisClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.endpoint(), "http://localhost:3000/api/analyze");
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let server = MockAnalysisServer::start(MockReply::sample_success()).await;
        let client = AnalysisClient::new(&server.url());

        let result = client
            .analyze(&AnalyzeRequest::new(50.0, "bought shoes"))
            .await
            .unwrap();

        assert_eq!(result.underlying_reason, "X");
        assert_eq!(result.behavioral_triggers, vec!["Y".to_string()]);
        assert_eq!(server.requests().len(), 1);
        assert_eq!(
            server.requests()[0],
            serde_json::json!({
                "actual_spent": 50.0,
                "spending_reason": "bought shoes",
                "spending_category": "general"
            })
        );
    }

    #[tokio::test]
    async fn test_analyze_success_with_string_recommendation() {
        let server = MockAnalysisServer::start(MockReply::success(serde_json::json!({
            "underlying_reason": "X",
            "behavioral_triggers": ["Y"],
            "recommendations": ["Take a walk"],
            "spending_reason": "bought shoes",
            "actual_spent": null,
            "category": "general"
        })))
        .await;
        let client = AnalysisClient::new(&server.url());

        let result = client
            .analyze(&AnalyzeRequest::new(50.0, "bought shoes"))
            .await
            .unwrap();

        assert_eq!(result.underlying_reason, "X");
        assert_eq!(result.behavioral_triggers, vec!["Y".to_string()]);
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].action, "Take a walk");
        assert!(result.actual_spent.is_nan());
    }

    #[tokio::test]
    async fn test_analyze_rejection_keeps_detail() {
        let server = MockAnalysisServer::start(MockReply::rejection(400, Some("invalid amount"))).await;
        let client = AnalysisClient::new(&server.url());

        let err = client
            .analyze(&AnalyzeRequest::new(50.0, "bought shoes"))
            .await
            .unwrap_err();

        match &err {
            Error::Rejected { status, detail } => {
                assert_eq!(*status, 400);
                assert_eq!(detail.as_deref(), Some("invalid amount"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.user_message(), "invalid amount");
    }

    #[tokio::test]
    async fn test_analyze_rejection_without_detail() {
        let server = MockAnalysisServer::start(MockReply::rejection(500, None)).await;
        let client = AnalysisClient::new(&server.url());

        let err = client
            .analyze(&AnalyzeRequest::new(5.0, "coffee"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), crate::error::GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_analyze_unreachable() {
        // Port 1 is reserved and never listening
        let client = AnalysisClient::new("http://127.0.0.1:1");
        let err = client
            .analyze(&AnalyzeRequest::new(5.0, "coffee"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert_eq!(err.user_message(), crate::error::GENERIC_FAILURE_MESSAGE);
    }
}
