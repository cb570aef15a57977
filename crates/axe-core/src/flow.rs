//! Get-started flow: form state plus the analysis request lifecycle
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Succeeded
//!   ▲                   │
//!   │                   └──err──▶ Failed
//!   └──── next field edit or next submit ────┘
//! ```
//!
//! The flow owns the [`SpendingInput`], the status, and at most one
//! [`AnalysisResult`]. `submit` takes `&mut self`, so only one request can
//! be in flight per flow.

use tracing::{info, warn};

use crate::client::AnalysisTransport;
use crate::form::{self, Impulsiveness, SpendingInput};
use crate::models::AnalysisResult;

/// Where the request lifecycle currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// What a call to [`GetStartedFlow::submit`] did
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Form is incomplete; nothing happened
    Blocked,
    /// User answered No; recorded locally, no request sent
    NotImpulsive,
    /// Analysis stored and ready to render
    Analyzed,
    /// Request failed; the message is what the user sees
    Failed { message: String },
}

pub struct GetStartedFlow<T: AnalysisTransport> {
    transport: T,
    input: SpendingInput,
    status: AnalysisStatus,
    result: Option<AnalysisResult>,
    error: Option<String>,
}

impl<T: AnalysisTransport> GetStartedFlow<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            input: SpendingInput::default(),
            status: AnalysisStatus::Idle,
            result: None,
            error: None,
        }
    }

    pub fn input(&self) -> &SpendingInput {
        &self.input
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn is_analyzing(&self) -> bool {
        self.status == AnalysisStatus::Submitting
    }

    /// Latest successful analysis, if any
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Message from the last failed attempt
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn can_submit(&self) -> bool {
        form::can_submit(&self.input, self.is_analyzing())
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.input.amount = amount.into();
        self.touch();
    }

    /// Answer the impulsiveness question
    ///
    /// Any new answer discards the held result. Answering No also clears the
    /// reason, which is hidden for that answer.
    pub fn set_impulsive(&mut self, answer: Impulsiveness) {
        self.input.impulsive = answer;
        if answer == Impulsiveness::No {
            self.input.reason.clear();
        }
        self.result = None;
        self.touch();
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.input.reason = reason.into();
        self.touch();
    }

    /// Field edits leave any terminal state and drop a stale error message
    fn touch(&mut self) {
        if self.status != AnalysisStatus::Submitting {
            self.status = AnalysisStatus::Idle;
            self.error = None;
        }
    }

    /// Submit the form
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Blocked;
        }

        self.status = AnalysisStatus::Idle;
        self.error = None;

        let request = match self.input.to_request() {
            Some(request) => request,
            None => {
                info!(
                    amount = %self.input.amount,
                    "User reports no impulsive spending; skipping analysis"
                );
                return SubmitOutcome::NotImpulsive;
            }
        };

        self.status = AnalysisStatus::Submitting;
        self.result = None;

        match self.transport.analyze(&request).await {
            Ok(result) => {
                info!(
                    triggers = result.behavioral_triggers.len(),
                    recommendations = result.recommendations.len(),
                    "Analysis received"
                );
                self.result = Some(result);
                self.status = AnalysisStatus::Succeeded;
                SubmitOutcome::Analyzed
            }
            Err(e) => {
                warn!(error = %e, "Analysis failed");
                let message = e.user_message();
                self.error = Some(message.clone());
                self.status = AnalysisStatus::Failed;
                SubmitOutcome::Failed { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{Error, Result};
    use crate::models::{AnalyzeRequest, Recommendation};

    /// Replays queued replies and records every request it sees
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<AnalysisResult>>>,
        seen: Mutex<Vec<AnalyzeRequest>>,
    }

    impl ScriptedTransport {
        fn with(replies: Vec<Result<AnalysisResult>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<AnalyzeRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnalysisTransport for ScriptedTransport {
        async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::InvalidData("no scripted reply".into())))
        }
    }

    fn result(reason: &str) -> AnalysisResult {
        AnalysisResult {
            underlying_reason: reason.to_string(),
            behavioral_triggers: vec!["Y".to_string()],
            recommendations: vec![Recommendation::new("A", "B")],
            spending_reason: "bought shoes".to_string(),
            actual_spent: 50.0,
            category: "general".to_string(),
        }
    }

    fn filled(transport: ScriptedTransport) -> GetStartedFlow<ScriptedTransport> {
        let mut flow = GetStartedFlow::new(transport);
        flow.set_amount("50");
        flow.set_impulsive(Impulsiveness::Yes);
        flow.set_reason("bought shoes");
        flow
    }

    #[tokio::test]
    async fn test_initial_state() {
        let flow = GetStartedFlow::new(ScriptedTransport::default());
        assert_eq!(flow.status(), AnalysisStatus::Idle);
        assert!(!flow.can_submit());
        assert!(flow.result().is_none());
        assert!(flow.error().is_none());
    }

    #[tokio::test]
    async fn test_successful_submit() {
        let mut flow = filled(ScriptedTransport::with(vec![Ok(result("X"))]));

        assert_eq!(flow.submit().await, SubmitOutcome::Analyzed);
        assert_eq!(flow.status(), AnalysisStatus::Succeeded);
        assert_eq!(flow.result().unwrap().underlying_reason, "X");

        let seen = flow.transport().seen();
        assert_eq!(seen, vec![AnalyzeRequest::new(50.0, "bought shoes")]);
    }

    #[tokio::test]
    async fn test_not_impulsive_is_noop() {
        let mut flow = GetStartedFlow::new(ScriptedTransport::default());
        flow.set_amount("20");
        flow.set_impulsive(Impulsiveness::No);

        assert!(flow.can_submit());
        assert_eq!(flow.submit().await, SubmitOutcome::NotImpulsive);
        assert!(flow.transport().seen().is_empty());
        assert!(flow.result().is_none());
        assert_eq!(flow.status(), AnalysisStatus::Idle);
    }

    #[tokio::test]
    async fn test_blocked_submit_sends_nothing() {
        let mut flow = GetStartedFlow::new(ScriptedTransport::default());
        flow.set_amount("50");
        flow.set_impulsive(Impulsiveness::Yes);

        assert_eq!(flow.submit().await, SubmitOutcome::Blocked);
        assert!(flow.transport().seen().is_empty());
        assert!(flow.error().is_none());
    }

    #[tokio::test]
    async fn test_rejection_surfaces_detail() {
        let mut flow = filled(ScriptedTransport::with(vec![
            Ok(result("old")),
            Err(Error::Rejected {
                status: 400,
                detail: Some("invalid amount".into()),
            }),
        ]));

        flow.submit().await;
        assert!(flow.result().is_some());

        let outcome = flow.submit().await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: "invalid amount".into()
            }
        );
        assert_eq!(flow.status(), AnalysisStatus::Failed);
        assert_eq!(flow.error(), Some("invalid amount"));
        assert!(flow.result().is_none());
        assert!(flow.can_submit());
    }

    #[tokio::test]
    async fn test_edit_after_failure_returns_to_idle() {
        let mut flow = filled(ScriptedTransport::with(vec![Err(Error::InvalidData(
            "bad body".into(),
        ))]));

        flow.submit().await;
        assert_eq!(flow.status(), AnalysisStatus::Failed);
        assert_eq!(flow.error(), Some(crate::error::GENERIC_FAILURE_MESSAGE));

        flow.set_reason("bought shoes on sale");
        assert_eq!(flow.status(), AnalysisStatus::Idle);
        assert!(flow.error().is_none());
    }

    #[tokio::test]
    async fn test_switching_to_no_clears_reason_and_result() {
        let mut flow = filled(ScriptedTransport::with(vec![Ok(result("X"))]));
        flow.submit().await;
        assert!(flow.result().is_some());

        flow.set_impulsive(Impulsiveness::No);
        assert_eq!(flow.input().reason, "");
        assert!(flow.result().is_none());
        assert!(!flow.input().reason_visible());
    }

    #[tokio::test]
    async fn test_selecting_yes_clears_result() {
        let mut flow = filled(ScriptedTransport::with(vec![Ok(result("X"))]));
        flow.submit().await;

        flow.set_impulsive(Impulsiveness::Yes);
        assert!(flow.result().is_none());
        assert_eq!(flow.input().reason, "bought shoes");
        assert!(flow.input().reason_visible());
    }

    #[tokio::test]
    async fn test_resubmit_replaces_result() {
        let mut flow = filled(ScriptedTransport::with(vec![
            Ok(result("first")),
            Ok(result("second")),
        ]));

        flow.submit().await;
        flow.submit().await;

        assert_eq!(flow.transport().seen().len(), 2);
        assert_eq!(flow.result().unwrap().underlying_reason, "second");
        assert_eq!(flow.result().unwrap().behavioral_triggers.len(), 1);
    }
}
