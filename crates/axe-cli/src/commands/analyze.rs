//! Analyze command implementation

use anyhow::{bail, Context, Result};
use axe_core::{
    render, AnalysisClient, AnalysisTransport, GetStartedFlow, Impulsiveness, SubmitOutcome,
};

pub async fn cmd_analyze(
    api_url: Option<&str>,
    amount: &str,
    impulsive: Impulsiveness,
    reason: Option<&str>,
    json: bool,
) -> Result<()> {
    let client = match api_url {
        Some(url) => AnalysisClient::new(url),
        None => AnalysisClient::from_env(),
    };
    tracing::debug!(endpoint = %client.endpoint(), "Using analysis service");

    let (outcome, output) = run_analysis(client, amount, impulsive, reason, json).await?;
    if let Some(output) = output {
        println!("{}", output);
    }

    match outcome {
        SubmitOutcome::Failed { message } => bail!("{}", message),
        _ => Ok(()),
    }
}

/// Fill the form, submit it, and produce what should be printed
pub async fn run_analysis<T: AnalysisTransport>(
    transport: T,
    amount: &str,
    impulsive: Impulsiveness,
    reason: Option<&str>,
    json: bool,
) -> Result<(SubmitOutcome, Option<String>)> {
    let mut flow = GetStartedFlow::new(transport);
    flow.set_amount(amount);
    flow.set_impulsive(impulsive);
    if let Some(reason) = reason {
        flow.set_reason(reason);
    }

    let outcome = flow.submit().await;
    let output = match &outcome {
        SubmitOutcome::Blocked => bail!("{}", missing_fields(&flow)),
        SubmitOutcome::NotImpulsive => Some(
            "👍 Not impulsive - nothing to analyze. Come back when a purchase surprises you."
                .to_string(),
        ),
        SubmitOutcome::Analyzed => {
            let result = flow
                .result()
                .context("Analysis finished without a result")?;
            if json {
                Some(serde_json::to_string_pretty(result)?)
            } else {
                Some(render(result).to_text())
            }
        }
        SubmitOutcome::Failed { .. } => None,
    };

    Ok((outcome, output))
}

/// Explain why the form cannot be submitted
fn missing_fields<T: AnalysisTransport>(flow: &GetStartedFlow<T>) -> String {
    let input = flow.input();
    if input.amount.trim().is_empty() {
        "An amount is required".to_string()
    } else if input.amount_value().is_none() {
        format!("'{}' is not a valid amount", input.amount)
    } else if input.impulsive == Impulsiveness::Unset {
        "Answer whether the purchase was impulsive".to_string()
    } else {
        "Tell us why you bought it (--reason)".to_string()
    }
}
