//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use axe_core::Impulsiveness;
use clap::{Parser, Subcommand};

/// Axe - See the behavior behind the purchase
#[derive(Parser)]
#[command(name = "axe")]
#[command(about = "Behavioral spending analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report a purchase and get behavioral feedback
    Analyze {
        /// Amount spent
        #[arg(short, long)]
        amount: String,

        /// Was it impulsive? (yes/no)
        #[arg(short, long, value_parser = parse_impulsiveness)]
        impulsive: Impulsiveness,

        /// Why you bought it (required when impulsive)
        #[arg(short, long)]
        reason: Option<String>,

        /// Analysis service URL (defaults to AXE_API_URL, then http://127.0.0.1:3000)
        #[arg(long)]
        api_url: Option<String>,

        /// Print the raw analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the analysis service
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory of pre-built site files to serve alongside the API
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Inspect the analysis prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List prompts and whether they are overridden
    List,
    /// Print a prompt's system and user sections
    Show {
        /// Prompt id (analyze_reason, generate_recommendations)
        id: String,
    },
}

fn parse_impulsiveness(s: &str) -> Result<Impulsiveness, String> {
    match s.parse::<Impulsiveness>()? {
        Impulsiveness::Unset => Err("answer yes or no".to_string()),
        answer => Ok(answer),
    }
}
