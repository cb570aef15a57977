//! Axe CLI - Behavioral spending analyzer
//!
//! Usage:
//!   axe analyze --amount 50 --impulsive yes --reason "..."   Get feedback on a purchase
//!   axe serve --port 3000                                    Start the analysis service
//!   axe prompts list                                         Show analysis prompts

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Analyze {
            amount,
            impulsive,
            reason,
            api_url,
            json,
        } => {
            commands::cmd_analyze(
                api_url.as_deref(),
                &amount,
                impulsive,
                reason.as_deref(),
                json,
            )
            .await
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&host, port, static_dir.as_deref()).await,
        Commands::Prompts { action } => {
            let mut library = axe_core::PromptLibrary::new();
            match action {
                None | Some(PromptsAction::List) => commands::cmd_prompts_list(&mut library),
                Some(PromptsAction::Show { id }) => commands::cmd_prompts_show(&mut library, &id),
            }
        }
    }
}
