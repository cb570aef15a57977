//! JSON parsing helpers for AI backend responses
//!
//! Models often wrap their JSON in markdown code fences or add a sentence
//! before/after it. These helpers peel that off before handing the payload to
//! serde.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::models::Recommendation;

use super::types::ReasonAnalysis;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)\s*```").expect("fence regex is valid")
    })
}

/// Return the body of the first fenced code block, or the trimmed input
pub fn strip_code_fences(response: &str) -> &str {
    let response = response.trim();
    fence_regex()
        .captures(response)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(response)
}

/// Truncate long responses for the error message
fn truncated(raw: &str) -> String {
    if raw.chars().count() > 200 {
        format!("{}...", raw.chars().take(200).collect::<String>())
    } else {
        raw.to_string()
    }
}

/// Slice between the first `open` and the last `close`, inclusive
fn delimited(response: &str, open: char, close: char) -> Option<&str> {
    let start = response.find(open)?;
    let end = response.rfind(close)?;
    (start < end).then(|| &response[start..=end])
}

/// Parse the underlying-reason step
pub fn parse_reason_analysis(response: &str) -> Result<ReasonAnalysis> {
    let body = strip_code_fences(response);
    let json_str = delimited(body, '{', '}').ok_or_else(|| {
        Error::InvalidData(format!(
            "No JSON found in AI response | Raw: {}",
            truncated(body)
        ))
    })?;

    serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from AI: {} | Raw: {}",
            e,
            truncated(json_str)
        ))
    })
}

/// Parse the recommendations step
///
/// Accepts an array of `{action, why}` objects, or a single such object.
pub fn parse_recommendations(response: &str) -> Result<Vec<Recommendation>> {
    let body = strip_code_fences(response);

    if let Some(json_str) = delimited(body, '[', ']') {
        if let Ok(list) = serde_json::from_str::<Vec<Recommendation>>(json_str) {
            return Ok(list);
        }
    }

    if let Some(json_str) = delimited(body, '{', '}') {
        if let Ok(single) = serde_json::from_str::<Recommendation>(json_str) {
            if !single.action.is_empty() {
                return Ok(vec![single]);
            }
        }
    }

    Err(Error::InvalidData(format!(
        "No recommendations found in AI response | Raw: {}",
        truncated(body)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");

        let bare = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fences(bare), "[1, 2]");

        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_reason_analysis() {
        let response = r#"{"underlying_reason": "You wanted to belong.", "triggers": ["Peer pressure", "FOMO"]}"#;
        let analysis = parse_reason_analysis(response).unwrap();
        assert_eq!(analysis.underlying_reason, "You wanted to belong.");
        assert_eq!(analysis.triggers, vec!["Peer pressure", "FOMO"]);
    }

    #[test]
    fn test_parse_reason_analysis_with_text_and_fence() {
        let response = "Here you go:\n```json\n{\"underlying_reason\": \"Stress.\", \"triggers\": [\"Stress relief seeking\"]}\n```\nHope that helps!";
        let analysis = parse_reason_analysis(response).unwrap();
        assert_eq!(analysis.underlying_reason, "Stress.");
        assert_eq!(analysis.triggers.len(), 1);
    }

    #[test]
    fn test_parse_reason_analysis_keeps_triggers_without_reason() {
        let analysis = parse_reason_analysis(r#"{"triggers": ["Boredom"]}"#).unwrap();
        assert_eq!(analysis.underlying_reason, "");
        assert_eq!(analysis.triggers, vec!["Boredom"]);
    }

    #[test]
    fn test_parse_reason_analysis_garbage() {
        assert!(parse_reason_analysis("I think you were bored.").is_err());
        assert!(parse_reason_analysis("{not json}").is_err());
    }

    #[test]
    fn test_parse_recommendations_array() {
        let response = r#"```json
[
  {"action": "Set a 48-hour rule.", "why": "Dopamine spike fades."},
  {"action": "Unsubscribe from sale emails.", "why": "Fewer cues, fewer urges."}
]
```"#;
        let recs = parse_recommendations(response).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].action, "Set a 48-hour rule.");
        assert_eq!(recs[1].why, "Fewer cues, fewer urges.");
    }

    #[test]
    fn test_parse_recommendations_single_object() {
        let response = r#"{"action": "Wait a day.", "why": "Urges pass."}"#;
        let recs = parse_recommendations(response).unwrap();
        assert_eq!(recs, vec![Recommendation::new("Wait a day.", "Urges pass.")]);
    }

    #[test]
    fn test_parse_recommendations_garbage() {
        assert!(parse_recommendations("Just stop buying things.").is_err());
        assert!(parse_recommendations(r#"{"tip": "spend less"}"#).is_err());
    }
}
