mod commands;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nashville_core::Settings;
use nashville_storage::PgStorage;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nashville")]
#[command(version, about = "Nashville event pipeline: collect, normalize and search events", long_about = None)]
struct Cli {
    /// Settings file (yaml, toml or json). Overrides NASHVILLE_SETTINGS.
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (and the ETL loop when etl_interval_secs is set)
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(short = 'H', long)]
        host: Option<String>,
    },
    /// Create or upgrade the database schema
    Migrate,
    /// Run API collectors and stage their captures in raw_data
    Collect {
        /// Collector labels (ticketmaster, seatgeek); all configured ones when omitted
        sources: Vec<String>,
    },
    /// Stage captures from a JSON, JSON array or JSON Lines file
    Ingest {
        /// Label written to raw_data.source_spider
        #[arg(short, long)]
        spider: String,
        file: PathBuf,
    },
    /// Normalize staged captures into events
    Normalize {
        /// Only process raw_data rows with a greater id
        #[arg(long, default_value = "0")]
        after_id: i64,
    },
    /// Keyword search over events
    Search {
        query: String,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// List distinct event sources
    Sources,
    /// Row counts for raw_data and events
    Stats,
    /// Delete every row from events and raw_data
    Clear {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

/// Connect to Postgres and bring the schema up to date.
pub(crate) async fn open_storage(settings: &Settings) -> Result<Arc<PgStorage>> {
    let url = settings.require_database_url()?;
    Ok(Arc::new(PgStorage::new(url, settings.pool).await?))
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = Settings::load(path)?;
    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json)?;
    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(settings, port, host).await?,
        Commands::Migrate => commands::migrate::run(&settings).await?,
        Commands::Collect { sources } => commands::pipeline::run_collect(&settings, &sources).await?,
        Commands::Ingest { spider, file } => {
            commands::pipeline::run_ingest(&settings, &spider, file).await?;
        },
        Commands::Normalize { after_id } => {
            commands::pipeline::run_normalize(&settings, after_id).await?;
        },
        Commands::Search { query, limit } => {
            commands::query::run_search(&settings, &query, limit).await?;
        },
        Commands::Sources => commands::query::run_sources(&settings).await?,
        Commands::Stats => commands::query::run_stats(&settings).await?,
        Commands::Clear { yes } => commands::pipeline::run_clear(&settings, yes).await?,
    }

    Ok(())
}
