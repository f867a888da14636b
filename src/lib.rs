pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::{Cli, Commands, ui};
use crate::core::config::AppConfig;
use crate::core::currency::RateProvider;
use crate::providers::bank::BankRateProvider;
use crate::store::LedgerStore;
use anyhow::{Context, Result};
use clap::CommandFactory;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    if let Commands::Setup = command {
        return setup();
    }

    let config = match cli.config_path.as_deref() {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_path = config.default_data_path()?;
    let mut store = LedgerStore::open(&data_path)?;
    let provider: Arc<dyn RateProvider> = Arc::new(BankRateProvider::new(&config.bank_base_url()));

    match command {
        Commands::Setup => unreachable!("Setup is handled before the store opens"),
        Commands::Tour(cmd) => cli::tour::run(&mut store, cmd),
        Commands::Entry(cmd) => cli::entry::run(&mut store, cmd),
        Commands::Prep(cmd) => cli::prep::run(&mut store, cmd),
        Commands::Summary { tour } => cli::summary::run(&store, tour),
        Commands::Rates(cmd) => cli::rates::run(&store, provider, cmd).await,
        Commands::Export { tour, out } => {
            let rates = store.slots().load_rates();
            let tour = store.ledger().resolve_tour(tour)?;
            cli::export::run(tour, &rates, &out)
        }
        Commands::Watch => {
            let every = Duration::from_secs(config.refresh_minutes() * 60);
            cli::watch::run(&store, provider, every).await
        }
        Commands::Reset { yes } => {
            if ui::confirm("Delete ALL tours, entries and stored rates?", yes)? {
                store.reset();
                println!("All data cleared");
            } else {
                println!("Aborted");
            }
            Ok(())
        }
    }
}

fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  bank:
    base_url: "https://rate.bot.com.tw"

refresh_minutes: 30
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    info!("Created default configuration at {}", path.display());
    println!("Created default configuration at {}", path.display());
    Ok(())
}
