//! Tally command-line front end.
//!
//! Wires configuration, logging, storage and the rate provider together and
//! exposes the ledger and converter operations as subcommands.

mod commands;

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::currency::Converter;
use tally_core::ledger::LedgerStore;
use tally_core::storage::{OpenDalStore, StorageProvider};
use tally_rates::CurrencyApiClient;
use tally_shared::{AppConfig, AppError};

use commands::Cli;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        let code = err.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let provider = StorageProvider::from(&config.storage);
    let store =
        OpenDalStore::from_provider(provider).map_err(|e| AppError::Storage(e.to_string()))?;
    info!(provider = store.provider_name(), "Storage ready");

    let client = CurrencyApiClient::new(&config.rates)
        .map_err(|e| AppError::ExternalService(e.to_string()))?;
    let converter = Arc::new(Converter::new(Arc::new(client)));
    let ledger = LedgerStore::new(Arc::new(store), converter);

    commands::execute(cli.command, &ledger, &config).await
}
