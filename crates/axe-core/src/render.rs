//! Result Renderer
//!
//! Turns an [`AnalysisResult`] into a small display tree. Rendering never
//! fails: empty fields come out as empty text, and a missing amount shows as
//! `NaN`.

use std::fmt::Write;

use crate::models::AnalysisResult;

/// One visual block of the result panel
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    /// Pill-style labels
    Tags(Vec<String>),
    /// Numbered action/why rows
    Recommendations(Vec<RecommendationRow>),
    /// Echo of what the user reported
    Summary {
        amount: String,
        category: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRow {
    pub number: usize,
    pub action: String,
    pub why: String,
}

/// Display tree for one analysis
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultView {
    pub blocks: Vec<Block>,
}

pub fn render(result: &AnalysisResult) -> ResultView {
    let rows = result
        .recommendations
        .iter()
        .enumerate()
        .map(|(i, r)| RecommendationRow {
            number: i + 1,
            action: r.action.clone(),
            why: r.why.clone(),
        })
        .collect();

    ResultView {
        blocks: vec![
            Block::Summary {
                amount: format_amount(result.actual_spent),
                category: result.category.clone(),
                reason: result.spending_reason.clone(),
            },
            Block::Heading("What's really going on".to_string()),
            Block::Paragraph(result.underlying_reason.clone()),
            Block::Heading("Behavioral triggers".to_string()),
            Block::Tags(result.behavioral_triggers.clone()),
            Block::Heading("What to try".to_string()),
            Block::Recommendations(rows),
        ],
    }
}

fn format_amount(amount: f64) -> String {
    if amount.is_nan() {
        "$NaN".to_string()
    } else {
        format!("${:.2}", amount)
    }
}

impl ResultView {
    /// Plain-text rendering for terminals
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Heading(text) => {
                    let _ = writeln!(out, "\n{}", text);
                    let _ = writeln!(out, "{}", "-".repeat(text.chars().count()));
                }
                Block::Paragraph(text) => {
                    let _ = writeln!(out, "{}", text);
                }
                Block::Tags(tags) => {
                    if tags.is_empty() {
                        let _ = writeln!(out, "(none)");
                    }
                    for tag in tags {
                        let _ = writeln!(out, "  • {}", tag);
                    }
                }
                Block::Recommendations(rows) => {
                    for row in rows {
                        let _ = writeln!(out, "  {}. {}", row.number, row.action);
                        let _ = writeln!(out, "     Why: {}", row.why);
                    }
                }
                Block::Summary {
                    amount,
                    category,
                    reason,
                } => {
                    let _ = writeln!(out, "You spent {} ({})", amount, category);
                    let _ = writeln!(out, "\"{}\"", reason);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recommendation;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            underlying_reason: "X".into(),
            behavioral_triggers: vec!["Y".into()],
            recommendations: vec![Recommendation::new("A", "B")],
            spending_reason: "bought shoes".into(),
            actual_spent: 50.0,
            category: "general".into(),
        }
    }

    #[test]
    fn test_render_surfaces_all_fields() {
        let view = render(&sample());

        assert!(view.blocks.contains(&Block::Paragraph("X".into())));
        assert!(view.blocks.contains(&Block::Tags(vec!["Y".into()])));
        assert!(view.blocks.contains(&Block::Recommendations(vec![RecommendationRow {
            number: 1,
            action: "A".into(),
            why: "B".into(),
        }])));
        assert!(view.blocks.contains(&Block::Summary {
            amount: "$50.00".into(),
            category: "general".into(),
            reason: "bought shoes".into(),
        }));
    }

    #[test]
    fn test_text_output() {
        let text = render(&sample()).to_text();
        assert!(text.contains("You spent $50.00 (general)"));
        assert!(text.contains("\nX\n"));
        assert!(text.contains("  • Y"));
        assert!(text.contains("  1. A"));
        assert!(text.contains("     Why: B"));
    }

    #[test]
    fn test_render_sparse_result() {
        let result: AnalysisResult = serde_json::from_str("{}").unwrap();
        let text = render(&result).to_text();
        assert!(text.contains("$NaN"));
        assert!(text.contains("(none)"));
    }
}
