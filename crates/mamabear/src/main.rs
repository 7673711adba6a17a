//! mamabear inventory client
//!
//! Collects host facts with the local introspection utilities and sends them to
//! the fleet backend.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use eyre::bail;
use mamabear_core::{Config, InventoryRun};
use mamabear_inventory::FactCatalog;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::ConfigSource;
use console::{ConsoleListener, ListenerSink};

#[derive(Parser)]
#[command(name = "mamabear", version)]
#[command(about = "Collect host inventory and send it to the fleet backend", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "MAMABEAR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the backend URL
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Override the fleet display name
    #[arg(long, global = true)]
    fleet_name: Option<String>,

    /// Print progress events as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect the inventory and send it to the backend (default)
    Run,
    /// Collect the inventory and print it without sending
    Collect,
    /// List the facts collected, in step order
    Facts,
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let (config, source) = config::load(cli.config.as_deref(), &config::default_paths())?;
    let config = config::apply_overrides(config, cli.backend_url, cli.fleet_name)?;

    init_tracing(&config.log_level, cli.log_json);

    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "loaded configuration"),
        ConfigSource::Defaults => warn!("no config file found, using defaults"),
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config, cli.json).await,
        Commands::Collect => collect(&config, cli.json).await,
        Commands::Facts => {
            for name in FactCatalog::macos().names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

async fn run(config: &Config, json: bool) -> Result<()> {
    let branding = config.branding()?;
    if !json {
        match &branding.logo {
            Some(logo) => println!("{} ({} byte logo)", branding.name, logo.len()),
            None => println!("{}", branding.name),
        }
    }

    let run = InventoryRun::from_config(config)?;
    let mut listener = ConsoleListener::new(std::io::stdout(), json);
    let outcome = run.start().drive(&mut listener).await?;

    if let Some(message) = outcome.error_message() {
        bail!("inventory transmission failed: {message}");
    }
    Ok(())
}

// Progress goes to stderr so stdout carries only the record
async fn collect(config: &Config, json: bool) -> Result<()> {
    let sink = ListenerSink::new(ConsoleListener::new(std::io::stderr(), json));
    let record = config.build_collector().collect_facts(&sink).await;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
