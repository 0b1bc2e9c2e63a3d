//! hh-collector CLI
//!
//! Collects vacancies for a query and prints them as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hh_collector::{
    config::load_validated,
    error::{AppError, Result},
    models::{ColumnarResult, Config, FilterSpec, Query, VacancyRecord},
    pipeline::{CollectRequest, Collector},
    services::{HttpSource, resolve_area},
    storage::{CacheStore, LocalCache},
};
use tokio_util::sync::CancellationToken;

/// hh-collector - Vacancy collector for the hh.ru API
#[derive(Parser, Debug)]
#[command(
    name = "hh-collector",
    version,
    about = "Collects, normalizes and caches hh.ru vacancies"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Override the cache directory from the config
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect vacancies and print them as JSON
    Collect(CollectArgs),

    /// Look up the area id for a city or region name
    Areas {
        /// City or region name, e.g. "Москва"
        name: String,
    },

    /// Delete every cached result
    ClearCache,

    /// Validate the configuration file
    Validate,
}

#[derive(clap::Args, Debug)]
struct CollectArgs {
    /// Search text
    #[arg(short, long)]
    text: Option<String>,

    /// Area id (1 is Moscow)
    #[arg(short, long)]
    area: Option<i64>,

    /// City name, resolved to an area id
    #[arg(long, conflicts_with = "area")]
    city: Option<String>,

    /// Professional role id (repeatable)
    #[arg(short = 'p', long = "role")]
    roles: Vec<i64>,

    /// Results per listing page
    #[arg(long)]
    per_page: Option<i64>,

    /// Ignore cached results and collect again
    #[arg(short, long)]
    refresh: bool,

    /// Concurrent detail requests
    #[arg(short = 'n', long)]
    workers: Option<usize>,

    /// Maximum number of vacancies
    #[arg(long)]
    limit: Option<usize>,

    /// Keep vacancies whose name contains this text
    #[arg(long)]
    name: Option<String>,

    /// Minimum lower salary bound (base currency)
    #[arg(long)]
    salary_from: Option<u64>,

    /// Maximum upper salary bound (base currency)
    #[arg(long)]
    salary_to: Option<u64>,

    /// Keep vacancies whose experience label contains this text
    #[arg(long)]
    experience: Option<String>,

    /// Required key skill (repeatable)
    #[arg(long = "skill")]
    key_skills: Vec<String>,

    /// Print a list of records instead of columns
    #[arg(long)]
    records: bool,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl CollectArgs {
    fn query(&self, config: &Config, area: Option<i64>) -> Query {
        let mut query = config.query.clone();
        if let Some(text) = &self.text {
            query.set("text", text.clone());
        }
        if let Some(area) = area.or(self.area) {
            query.set("area", area);
        }
        if !self.roles.is_empty() {
            query.set("professional_role", self.roles.clone());
        }
        if let Some(per_page) = self.per_page {
            query.set("per_page", per_page);
        }
        query
    }

    fn filter(&self, config: &Config) -> FilterSpec {
        let mut filter = config.filter.clone();
        if self.name.is_some() {
            filter.name = self.name.clone();
        }
        if self.salary_from.is_some() {
            filter.salary_from = self.salary_from;
        }
        if self.salary_to.is_some() {
            filter.salary_to = self.salary_to;
        }
        if self.experience.is_some() {
            filter.experience = self.experience.clone();
        }
        if !self.key_skills.is_empty() {
            filter.key_skills = self.key_skills.clone();
        }
        filter
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_validated(&cli.config)?;
    if let Some(dir) = cli.cache_dir {
        config.cache.dir = dir;
    }
    let cache = LocalCache::new(&config.cache.dir);

    match cli.command {
        Command::Collect(args) => run_collect(&config, cache, args).await?,

        Command::Areas { name } => {
            let source = HttpSource::from_config(&config.api)?;
            let id = resolve_area(&source, &name).await?;
            println!("{id}");
        }

        Command::ClearCache => {
            let removed = cache.clear().await?;
            log::info!(
                "Removed {} cached results from {}",
                removed,
                cache.root_dir().display()
            );
        }

        Command::Validate => {
            log::info!("✓ Config OK ({} exchange rates)", config.rates.len());
        }
    }

    Ok(())
}

async fn run_collect(config: &Config, cache: LocalCache, args: CollectArgs) -> Result<()> {
    let source = Arc::new(HttpSource::from_config(&config.api)?);

    let area = match &args.city {
        Some(city) => Some(
            resolve_area(&source, city)
                .await?
                .parse::<i64>()
                .map_err(|e| AppError::malformed("area tree", e))?,
        ),
        None => None,
    };

    let request = CollectRequest {
        query: args.query(config, area),
        refresh: args.refresh,
        filter: Some(args.filter(config)),
        limit: args.limit.or(config.limit),
    };

    let mut collector = Collector::from_config(config, source, Arc::new(cache))?;
    if let Some(workers) = args.workers {
        collector = collector.workers(workers);
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling collection");
            on_interrupt.cancel();
        }
    });

    let result = collector.collect_with_cancel(&request, cancel).await?;
    log::info!("Collected {} vacancies", result.len());

    let json = if args.records {
        let records: Vec<VacancyRecord> = result.records().collect();
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string_pretty::<ColumnarResult>(&result)?
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            log::info!("Saved to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
