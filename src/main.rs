// src/main.rs

//! newscrawl: incremental news scraper CLI.

use clap::{Parser, Subcommand};
use env_logger::Env;

use newscrawl::error::Result;
use newscrawl::models::Config;
use newscrawl::pipeline::{recent_articles, run_cycle, run_scheduler};
use newscrawl::storage;
use newscrawl::utils::HttpFetcher;

#[derive(Parser, Debug)]
#[command(name = "newscrawl", version, about = "Incremental news scraper")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the periodic scraper until stopped
    Run,
    /// Run a single scrape cycle and exit
    Once,
    /// Print the most recent articles as JSON
    Recent {
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: i64,
    },
    /// Validate the configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The config supplies the log level, so load it first but hold the
    // failure warning until the logger exists. RUST_LOG overrides the
    // configured level.
    let loaded = Config::load(&cli.config);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(&config.logging.level)).init();
    if let Err(e) = &loaded {
        log::warn!(
            "Config load failed from {:?}: {}. Using defaults.",
            cli.config,
            e
        );
    }

    match cli.command {
        Command::Run => {
            config.validate()?;
            let pool = storage::connect(&config.database.url).await?;
            run_scheduler(config, pool).await
        }
        Command::Once => {
            config.validate()?;
            let pool = storage::connect(&config.database.url).await?;
            let fetcher = HttpFetcher::new(&config.crawler)?;
            let outcome = run_cycle(&config, &pool, &fetcher).await;
            println!(
                "discovered={} new={} persisted={}",
                outcome.discovered, outcome.new, outcome.persisted
            );
            match outcome.error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
        Command::Recent { limit } => {
            let pool = storage::connect(&config.database.url).await?;
            let articles = recent_articles(&pool, limit).await?;
            println!("{}", serde_json::to_string_pretty(&articles)?);
            Ok(())
        }
        Command::Validate => {
            config.validate()?;
            println!("Configuration OK");
            Ok(())
        }
    }
}
