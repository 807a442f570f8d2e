//! Command-line interface definitions and handlers.

use adforge::{
    AdSession, AdforgeConfig, AppState, CreditLedger, ErrorLogger, GeminiClient, ListingDetails,
    RecordStore, SecurityGate, Tone,
};
use adforge_error::{AdforgeResult, StateError, StateErrorKind};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// AI-assisted classified ad copy generator.
#[derive(Debug, Parser)]
#[command(name = "adforge", version, about)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the HTTP API.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },
    /// Generate ad copy from a listing form.
    Generate {
        /// Path to a JSON listing form.
        form: PathBuf,
        /// Copy tone.
        #[arg(long, default_value = "polite")]
        tone: Tone,
        /// Model identifier override.
        #[arg(long)]
        model: Option<String>,
    },
    /// Rewrite generated copy with SEO keywords.
    Optimize {
        /// Path to a JSON listing form.
        form: PathBuf,
    },
    /// Show a user's credit balance and history.
    Credits {
        /// The user to look up.
        user_id: String,
    },
}

fn load_form(path: &Path) -> AdforgeResult<ListingDetails> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| StateError::new(StateErrorKind::Restore(format!("{}: {e}", path.display()))))?;
    let details = serde_json::from_str(&raw)
        .map_err(|e| StateError::new(StateErrorKind::Restore(format!("{}: {e}", path.display()))))?;
    Ok(details)
}

fn session_dir() -> Option<PathBuf> {
    let dir = dirs::data_dir()?.join("adforge");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

fn build_session(config: &AdforgeConfig, model: Option<&str>) -> AdforgeResult<AdSession> {
    let driver = Arc::new(GeminiClient::from_env(config, model)?);
    let mut session = match session_dir() {
        Some(dir) => AdSession::with_store(driver, config, &dir),
        None => AdSession::new(driver, config),
    };
    // Metered mode needs both a ledger backend and a user identity.
    if let (Ok(ledger), Ok(user_id)) = (
        CreditLedger::from_env(config.credits),
        std::env::var("ADFORGE_USER_ID"),
    ) {
        info!(user_id = %user_id, "Running metered against the credit ledger");
        session = session.with_ledger(ledger, user_id);
    }
    Ok(session)
}

fn apply_form(session: &mut AdSession, details: ListingDetails) {
    session.set_category(details.category());
    match details {
        ListingDetails::Electronics(data) => session.forms_mut().electronics = data,
        ListingDetails::Auto(data) => session.forms_mut().auto = data,
        ListingDetails::Services(data) => session.forms_mut().services = data,
        ListingDetails::Clothing(data) => session.forms_mut().clothing = data,
    }
}

/// `adforge generate` handler.
pub async fn run_generate(form: &Path, tone: Tone, model: Option<&str>) -> AdforgeResult<()> {
    let config = AdforgeConfig::load()?;
    let mut session = build_session(&config, model)?;
    apply_form(&mut session, load_form(form)?);
    session.set_tone(tone);

    let ad = session.generate().await?;
    println!("{}\n", ad.ad_text);
    if !ad.smart_tip.is_empty() {
        println!("💡 {}", ad.smart_tip);
    }
    Ok(())
}

/// `adforge optimize` handler.
pub async fn run_optimize(form: &Path) -> AdforgeResult<()> {
    let config = AdforgeConfig::load()?;
    let mut session = build_session(&config, None)?;
    apply_form(&mut session, load_form(form)?);

    let ad = session.optimize().await?;
    println!("{}", ad.tagged_text());
    Ok(())
}

/// `adforge credits` handler.
pub async fn run_credits(user_id: &str) -> AdforgeResult<()> {
    let config = AdforgeConfig::load()?;
    let ledger = CreditLedger::from_env(config.credits)?;
    let summary = ledger.summary(user_id).await?;

    println!("Credits: {:.1}", summary.credits);
    for entry in &summary.history {
        println!(
            "  {}  {:>6.1}  {}  {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.amount,
            entry.transaction_type,
            entry.description
        );
    }
    Ok(())
}

/// `adforge serve` handler.
pub async fn run_serve(bind: SocketAddr) -> AdforgeResult<()> {
    let config = AdforgeConfig::load()?;
    let driver = Arc::new(GeminiClient::from_env(&config, None)?);

    let logger = match (std::env::var("LEDGER_URL"), std::env::var("LEDGER_API_KEY")) {
        (Ok(url), Ok(key)) => ErrorLogger::new(url, key),
        _ => {
            warn!("No ledger backend configured, error logging disabled");
            ErrorLogger::disabled()
        }
    };
    let gate = SecurityGate::new(&config.security, logger);

    let ledger = CreditLedger::from_env(config.credits).ok();
    if ledger.is_none() {
        warn!("No ledger backend configured, running unmetered");
    }
    let records = match (std::env::var("LEDGER_URL"), std::env::var("LEDGER_API_KEY")) {
        (Ok(url), Ok(key)) => RecordStore::new(url, key),
        _ => RecordStore::disabled(),
    };

    let state = AppState::new(driver, gate, ledger, records);
    info!("Starting adforge API");
    adforge::serve(bind, state).await
}
