//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Get-started flow against the analysis service
//! - `prompts` - Prompt library inspection
//! - `serve` - Analysis service command

pub mod analyze;
pub mod prompts;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use prompts::*;
pub use serve::*;
