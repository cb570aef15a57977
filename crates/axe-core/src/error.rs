//! Error types for Axe

use thiserror::Error;

/// Message shown when the analysis endpoint fails without a usable `detail`
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze spending. Please try again.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The analysis endpoint answered with a non-success status
    #[error("Analysis rejected ({status}): {}", detail_text(.detail))]
    Rejected { status: u16, detail: Option<String> },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl Error {
    /// Text to put in front of the user for a failed analysis attempt
    ///
    /// Remote rejections carry the server's `detail` verbatim. Everything else
    /// (unreachable server, malformed body) collapses to one generic message.
    pub fn user_message(&self) -> String {
        match self {
            Error::Rejected {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

fn detail_text(detail: &Option<String>) -> &str {
    detail.as_deref().unwrap_or("no detail")
}

pub type Result<T> = std::result::Result<T, Error>;
