//! Input collection for the get-started form
//!
//! The form holds three fields: the amount the user spent, whether they
//! consider the purchase impulsive, and (only when it was) why they made it.
//! Submission gating is a pure function of these fields plus the in-flight
//! flag, recomputed on every read.

use std::fmt;
use std::str::FromStr;

use crate::models::AnalyzeRequest;

/// Answer to "Do you spend impulsively?"
///
/// `Unset` means the question has not been answered yet, which is not the
/// same as answering No.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Impulsiveness {
    #[default]
    Unset,
    Yes,
    No,
}

impl Impulsiveness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for Impulsiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Impulsiveness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(Self::Yes),
            "no" | "n" | "false" => Ok(Self::No),
            "" | "unset" => Ok(Self::Unset),
            other => Err(format!("Expected yes or no, got '{}'", other)),
        }
    }
}

/// Current contents of the get-started form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendingInput {
    /// Amount as typed by the user
    pub amount: String,
    pub impulsive: Impulsiveness,
    /// Free-text reason, only meaningful when `impulsive` is `Yes`
    pub reason: String,
}

impl SpendingInput {
    /// Parse the amount field as a finite, non-negative number
    pub fn amount_value(&self) -> Option<f64> {
        let value: f64 = self.amount.trim().parse().ok()?;
        (value.is_finite() && value >= 0.0).then_some(value)
    }

    /// Whether the reason field is shown
    pub fn reason_visible(&self) -> bool {
        self.impulsive == Impulsiveness::Yes
    }

    /// Build the outbound request body, if the form describes an impulsive purchase
    pub fn to_request(&self) -> Option<AnalyzeRequest> {
        if self.impulsive != Impulsiveness::Yes {
            return None;
        }
        let amount = self.amount_value()?;
        Some(AnalyzeRequest::new(amount, self.reason.trim()))
    }
}

/// Whether the submit control is enabled
pub fn can_submit(input: &SpendingInput, analyzing: bool) -> bool {
    if analyzing || input.amount.trim().is_empty() || input.amount_value().is_none() {
        return false;
    }
    match input.impulsive {
        Impulsiveness::Unset => false,
        Impulsiveness::No => true,
        Impulsiveness::Yes => !input.reason.trim().is_empty(),
    }
}
