//! Prompt library for the analysis agent
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/axe/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Each prompt is markdown with YAML frontmatter and `# System` / `# User`
//! sections. Placeholders use `{{name}}`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const ANALYZE_REASON: &str = include_str!("../../../prompts/analyze_reason.md");
    pub const GENERATE_RECOMMENDATIONS: &str =
        include_str!("../../../prompts/generate_recommendations.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Step 1: the psychological reason behind a purchase
    AnalyzeReason,
    /// Step 2: evidence-based techniques for that reason
    GenerateRecommendations,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnalyzeReason => "analyze_reason",
            Self::GenerateRecommendations => "generate_recommendations",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[Self::AnalyzeReason, Self::GenerateRecommendations]
    }

    /// Look up a prompt by its string identifier
    pub fn parse(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.as_str() == id)
    }

    /// Get the default embedded content for this prompt
    fn default_content(&self) -> &'static str {
        match self {
            Self::AnalyzeReason => defaults::ANALYZE_REASON,
            Self::GenerateRecommendations => defaults::GENERATE_RECOMMENDATIONS,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    /// Unique identifier
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    /// The prompt body (system + user sections)
    pub content: String,
    pub is_override: bool,
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the system section with variables replaced
    pub fn render_system(&self, vars: &HashMap<&str, &str>) -> Result<String> {
        let section = self.system_section().ok_or_else(|| {
            Error::Prompt(format!("{} has no # System section", self.metadata.id))
        })?;
        Ok(substitute(section, vars))
    }

    /// Render the user section with variables replaced
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> Result<String> {
        let section = self.user_section().ok_or_else(|| {
            Error::Prompt(format!("{} has no # User section", self.metadata.id))
        })?;
        Ok(substitute(section, vars))
    }
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        match self.cache.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let prompt = load(self.override_dir.as_ref(), id)?;
                Ok(entry.insert(prompt))
            }
        }
    }

    /// List all prompts with their override status
    pub fn list(&mut self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .map(|&id| {
                let override_path = self.override_path(id).filter(|p| p.exists());
                let version = self.get(id).map(|p| p.metadata.version).unwrap_or(0);
                PromptInfo {
                    id: id.as_str().to_string(),
                    version,
                    has_override: override_path.is_some(),
                    override_path,
                }
            })
            .collect()
    }

    /// Check if a prompt has an override file
    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_path(id).is_some_and(|p| p.exists())
    }

    fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(format!("{}.md", id.as_str())))
    }

    /// Get the override directory path
    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a prompt for listing
#[derive(Debug, Clone)]
pub struct PromptInfo {
    pub id: String,
    pub version: u32,
    pub has_override: bool,
    pub override_path: Option<PathBuf>,
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("axe").join("prompts").join("overrides"))
}

/// Load a prompt (checking override first, then default)
fn load(override_dir: Option<&PathBuf>, id: PromptId) -> Result<Prompt> {
    if let Some(dir) = override_dir {
        let override_path = dir.join(format!("{}.md", id.as_str()));
        if override_path.exists() {
            let content = fs::read_to_string(&override_path)
                .map_err(|e| Error::Prompt(format!("Failed to read prompt override: {}", e)))?;
            let (metadata, body) = parse_prompt(&content)?;
            tracing::debug!(prompt = id.as_str(), path = %override_path.display(), "Using prompt override");
            return Ok(Prompt {
                metadata,
                content: body,
                is_override: true,
                override_path: Some(override_path),
            });
        }
    }

    let (metadata, body) = parse_prompt(id.default_content())?;
    Ok(Prompt {
        metadata,
        content: body,
        is_override: false,
        override_path: None,
    })
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    let rest = content
        .strip_prefix("---")
        .ok_or_else(|| Error::Prompt("Prompt must start with YAML frontmatter (---)".into()))?;

    let end = rest.find("---").ok_or_else(|| {
        Error::Prompt("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::Prompt(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    // Runs until the next top-level header or end of content
    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder regex is valid"))
}

/// Mustache-style replacement of `{{var}}` in a single pass
///
/// Substituted values are never rescanned. Unknown placeholders are left as-is.
fn substitute(template: &str, vars: &HashMap<&str, &str>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => (*value).to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt() {
        let content = r#"---
id: test_prompt
version: 3
---

# System
Test system prompt.

# User
Test user prompt with {{variable}}.
"#;

        let (metadata, body) = parse_prompt(content).unwrap();
        assert_eq!(metadata.id, "test_prompt");
        assert_eq!(metadata.version, 3);
        assert!(body.contains("# System"));
        assert!(body.contains("# User"));
    }

    #[test]
    fn test_parse_prompt_without_frontmatter() {
        assert!(parse_prompt("# System\nhi").is_err());
        assert!(parse_prompt("---\nid: x\nversion: 1\n").is_err());
    }

    #[test]
    fn test_extract_section() {
        let content = "# System\nSystem content here.\n\n# User\nUser content here.";

        assert_eq!(
            extract_section(content, "# System"),
            Some("System content here.")
        );
        assert_eq!(
            extract_section(content, "# User"),
            Some("User content here.")
        );
    }

    #[test]
    fn test_render_user() {
        let mut lib = PromptLibrary::embedded_only();
        let prompt = lib.get(PromptId::AnalyzeReason).unwrap();

        let mut vars = HashMap::new();
        vars.insert("amount", "50");
        vars.insert("reason", "bought shoes");
        vars.insert("category", "general");

        let user = prompt.render_user(&vars).unwrap();
        assert!(user.contains("Amount spent: $50"));
        assert!(user.contains("What they said: \"bought shoes\""));
        assert!(!user.contains("{{"));
    }

    #[test]
    fn test_substitute_does_not_expand_values() {
        let mut vars = HashMap::new();
        vars.insert("reason", "saw {{category}} on sale for {{amount}}");
        vars.insert("category", "general");
        vars.insert("amount", "50");

        let out = substitute("{{amount}} {{category}}: {{reason}} {{missing}}", &vars);
        assert_eq!(out, "50 general: saw {{category}} on sale for {{amount}} {{missing}}");
    }

    #[test]
    fn test_default_prompts_parse() {
        let mut lib = PromptLibrary::embedded_only();
        for id in PromptId::all() {
            let prompt = lib.get(*id).unwrap();
            assert_eq!(prompt.metadata.id, id.as_str());
            assert!(!prompt.is_override);
            assert!(prompt.system_section().is_some());
            assert!(prompt.user_section().is_some());
        }
    }

    #[test]
    fn test_recommendations_prompt_asks_for_why() {
        let mut lib = PromptLibrary::embedded_only();
        let system = lib
            .get(PromptId::GenerateRecommendations)
            .unwrap()
            .render_system(&HashMap::new())
            .unwrap();
        assert!(system.contains("\"why\""));

        let system = lib
            .get(PromptId::AnalyzeReason)
            .unwrap()
            .render_system(&HashMap::new())
            .unwrap();
        assert!(!system.contains("\"why\""));
    }

    #[test]
    fn test_override_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("analyze_reason.md"),
            "---\nid: analyze_reason\nversion: 9\n---\n\n# System\nCustom.\n\n# User\n{{reason}}\n",
        )
        .unwrap();

        let mut lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(lib.has_override(PromptId::AnalyzeReason));
        assert!(!lib.has_override(PromptId::GenerateRecommendations));

        let prompt = lib.get(PromptId::AnalyzeReason).unwrap();
        assert!(prompt.is_override);
        assert_eq!(prompt.metadata.version, 9);
        assert_eq!(prompt.system_section(), Some("Custom."));

        let listed = lib.list();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].has_override);
        assert_eq!(listed[0].version, 9);
        assert!(!listed[1].has_override);
    }

    #[test]
    fn test_prompt_id_parse() {
        assert_eq!(
            PromptId::parse("generate_recommendations"),
            Some(PromptId::GenerateRecommendations)
        );
        assert_eq!(PromptId::parse("nope"), None);
    }
}
