//! OI Tracker
//!
//! Entry point for one tracking run:
//! - reconcile table headers
//! - classify OI/price moves, rollover and expiry delivery from an observations file
//! - append the resulting rows to the configured table store

use clap::Parser;
use oi_tracker::calendar::is_trading_day;
use oi_tracker::cli::{Cli, Command};
use oi_tracker::config::{parse_symbols, AppConfig};
use oi_tracker::error::{AppError, AppResult};
use oi_tracker::services::{CsvObservationSource, OiTracker};
use oi_tracker::store::{self, TableStore};
use oi_tracker::{build_tracker, init_tables};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("oi_tracker={},reqwest=warn", config.log_level).into());

    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn tracker(config: &AppConfig, input: PathBuf, store: Arc<dyn TableStore>) -> OiTracker {
    info!("Reading observations from {}", input.display());
    let tracker = build_tracker(config, Arc::new(CsvObservationSource::new(input)), store);
    info!("Tracking {} symbols", tracker.symbols().len());
    tracker
}

async fn run(cli: Cli, config: AppConfig) -> AppResult<()> {
    let today = chrono::Local::now().date_naive();
    if config.skip_non_trading_days && !cli.force && !is_trading_day(today) {
        info!("Market closed today ({}). Skipping run.", today);
        return Ok(());
    }

    info!("Store backend: {:?}", config.store.backend);
    let store = store::open(&config.store)?;

    let appended = match cli.command {
        Command::Init => {
            for (table, status) in init_tables(&config, store).await? {
                info!("✓ {}: {:?}", table, status);
            }
            return Ok(());
        }
        Command::EodSummary { input } => {
            tracker(&config, input, store).record_eod_summary().await?
        }
        Command::OiLog { input } => tracker(&config, input, store).record_oi_log().await?,
        Command::Rollover { input } => tracker(&config, input, store).record_rollover().await?,
        Command::ExpiryDelivery { input, expiry } => {
            tracker(&config, input, store)
                .record_expiry_delivery(expiry)
                .await?
        }
    };

    info!("✓ Wrote {} rows", appended);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(AppError::Config(e).exit_code());
        }
    };

    if let Some(symbols) = cli.symbols.as_deref() {
        config.symbols = parse_symbols(symbols);
        if config.symbols.is_empty() {
            eprintln!("Configuration error: --symbols must name at least one symbol");
            std::process::exit(AppError::Config(String::new()).exit_code());
        }
    }

    init_tracing(&config);

    if let Err(e) = run(cli, config).await {
        if e.is_no_data() {
            warn!("Nothing to write: {}", e);
        } else {
            error!("Run failed: {}", e);
        }
        std::process::exit(e.exit_code());
    }
}
