//! Prompt library commands

use anyhow::{anyhow, Result};
use axe_core::{PromptId, PromptLibrary};

pub fn cmd_prompts_list(library: &mut PromptLibrary) -> Result<()> {
    println!("📝 Analysis prompts");
    if let Some(dir) = library.override_dir() {
        println!("   Overrides: {}", dir.display());
    }
    println!();

    for info in library.list() {
        let marker = if info.has_override { "✏️ " } else { "  " };
        println!("{} {:<26} v{}", marker, info.id, info.version);
        if let Some(path) = info.override_path {
            println!("      → {}", path.display());
        }
    }
    Ok(())
}

pub fn cmd_prompts_show(library: &mut PromptLibrary, id: &str) -> Result<()> {
    let prompt_id = PromptId::parse(id).ok_or_else(|| {
        let known: Vec<&str> = PromptId::all().iter().map(|p| p.as_str()).collect();
        anyhow!("Unknown prompt '{}' (known: {})", id, known.join(", "))
    })?;

    let prompt = library.get(prompt_id)?;
    println!(
        "# {} (v{}{})",
        prompt.metadata.id,
        prompt.metadata.version,
        if prompt.is_override { ", override" } else { "" }
    );
    println!();
    println!("{}", prompt.content);
    Ok(())
}
