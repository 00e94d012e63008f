//! Pending Catalog CLI
//!
//! Lists package recipes proposed in open submissions to the index.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pending_catalog::{
    CatalogCache, Pipeline, Request,
    error::{AppError, Result},
    models::{Catalog, CatalogEntry, Config},
    run,
    storage::{CatalogStorage, LocalStorage},
    utils::http::HttpClient,
};

/// pending-catalog - Browse package recipes awaiting review
#[derive(Parser, Debug)]
#[command(
    name = "pending-catalog",
    version,
    about = "Browse package recipes from open index submissions"
)]
struct Cli {
    /// Path to storage directory containing config and cache files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the cached catalog, building it first if empty
    List,

    /// Rebuild the catalog from open submissions
    Refresh,

    /// Show one package and its recipe
    Show {
        /// Package name
        package: String,
    },

    /// Validate configuration file
    Validate,

    /// Show cache location and snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Print one line per catalog entry.
fn print_catalog(catalog: &Catalog) {
    for entry in catalog.values() {
        let date = entry
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:<10} {:<4} {}  <{}>",
            entry.package,
            date,
            entry.source.label,
            entry.description.to_plain(),
            entry.url
        );
    }
}

/// Print an entry with its links and recipe.
fn print_entry(entry: &CatalogEntry) {
    println!("Package:     {}", entry.package);
    println!("Source:      {} <{}>", entry.source.label, entry.source.target);
    if let Some(date) = entry.date {
        println!("Submitted:   {}", date.to_rfc3339());
    }
    println!("URL:         {}", entry.url);
    println!("Description: {}", entry.description.to_plain());
    for link in entry.description.links() {
        println!("    {} <{}>", link.label, link.target);
    }
    println!();
    println!("{}", entry.recipe.to_sexp());
}

/// Build the cache and pipeline used by catalog commands.
async fn open_catalog(
    config: Config,
    storage: Arc<LocalStorage>,
) -> Result<(CatalogCache, Pipeline)> {
    config.validate()?;
    let client = HttpClient::from_config(&config.http)?;
    let pipeline = Pipeline::new(Arc::new(config), Arc::new(client));
    let cache = CatalogCache::init(storage).await;
    Ok((cache, pipeline))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    log::debug!("Loaded configuration from {}", config_path.display());

    let storage = Arc::new(LocalStorage::new(cli.storage_dir.join(&config.cache.file)));

    match cli.command {
        Command::List => {
            let (cache, pipeline) = open_catalog(config, storage).await?;
            let catalog = run(Request::List, &cache, &pipeline).await?;
            print_catalog(&catalog);
            log::info!("{} packages", catalog.len());
        }

        Command::Refresh => {
            let (cache, pipeline) = open_catalog(config, storage).await?;
            let catalog = run(Request::Refresh, &cache, &pipeline).await?;
            print_catalog(&catalog);
            log::info!("{} packages", catalog.len());
        }

        Command::Show { package } => {
            let (cache, pipeline) = open_catalog(config, storage).await?;
            let catalog = run(Request::List, &cache, &pipeline).await?;
            let entry = catalog.get(&package).ok_or_else(|| {
                AppError::validation(format!("no pending submission for {package}"))
            })?;
            print_entry(entry);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("Listing endpoint: {}", config.index.pulls_url());
            log::info!(
                "Accepted fetchers: {}",
                config
                    .recipe
                    .fetchers
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!("Catalog file: {}", storage.path().display());

            match storage.load().await {
                Ok(Some(snapshot)) => {
                    log::info!("Last refreshed: {}", snapshot.updated_at);
                    log::info!("Entries: {}", snapshot.count);
                }
                Ok(None) => log::info!("No catalog cached yet."),
                Err(e) => log::warn!("Catalog unreadable: {}", e),
            }
        }
    }

    Ok(())
}
