//! Adforge CLI binary.
//!
//! Command-line access to the ad generator:
//! - Generate and optimize listing copy from JSON forms
//! - Query credit balances
//! - Serve the HTTP API

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_credits, run_generate, run_optimize, run_serve};

    // Pick up GEMINI_API_KEY and ledger settings from a local .env if present.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { bind } => {
            run_serve(bind).await?;
        }

        Commands::Generate { form, tone, model } => {
            run_generate(&form, tone, model.as_deref()).await?;
        }

        Commands::Optimize { form } => {
            run_optimize(&form).await?;
        }

        Commands::Credits { user_id } => {
            run_credits(&user_id).await?;
        }
    }

    Ok(())
}
