mod commands;
mod pipeline;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "teadb")]
#[command(about = "Scrape tea retailers into the tea catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every source, reconcile the catalog, and deactivate stale listings
    Run {
        /// Print the upserted records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load tea types, sources, and tags from the reference file
    Seed {
        /// Reference file; defaults to TEADB_REFERENCE_PATH
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Apply pending database migrations
    Migrate,
    /// Search active listings
    Search {
        /// Tea type to include (repeatable; any match)
        #[arg(long = "type")]
        tea_types: Vec<String>,
        /// Keywords that must all appear in the description
        #[arg(long)]
        text: Option<String>,
        /// Tag the tea must carry (repeatable; all must match)
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// List tea types
    Types,
}

impl Commands {
    /// Every command except `migrate` works against the catalog tables, so a
    /// fresh database is migrated before it runs.
    fn needs_schema(&self) -> bool {
        !matches!(self, Commands::Migrate)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = teadb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, "starting teadb");

    let pool_config = teadb_db::PoolConfig::from_app_config(&config);
    let pool = teadb_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to open catalog database")?;

    let command = cli.command.unwrap_or(Commands::Run { json: false });
    if command.needs_schema() {
        commands::ensure_schema(&pool).await?;
    }

    let result = match command {
        Commands::Run { json } => {
            let fetcher = teadb_scraper::PageFetcher::from_config(&config)?;
            let settings = teadb_scraper::ExtractorSettings::from_config(&config);
            let extractors = teadb_scraper::default_extractors(&settings);
            let summary =
                pipeline::run_pipeline(&pool, &fetcher, &extractors, config.max_age_days).await?;
            commands::print_run_summary(&summary, json)
        }
        Commands::Seed { path } => {
            let path = path.unwrap_or_else(|| config.reference_path.clone());
            commands::run_seed(&pool, &path).await
        }
        Commands::Migrate => commands::run_migrate(&pool).await,
        Commands::Search {
            tea_types,
            text,
            tags,
            json,
        } => commands::run_search(&pool, tea_types, text.as_deref(), tags, json).await,
        Commands::Types => commands::run_types(&pool).await,
    };

    pool.close().await;
    result
}

#[cfg(test)]
mod tests;
