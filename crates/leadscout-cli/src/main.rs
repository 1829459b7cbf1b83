mod output;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "leadscout")]
#[command(about = "Business lead scraper for map search results")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape leads from a saved results page
    Scrape {
        /// Business category to search for, e.g. "Dentists"
        #[arg(long)]
        keyword: String,

        /// City or area to search in, e.g. "Denver"
        #[arg(long)]
        location: String,

        /// Captured results page to replay
        #[arg(long)]
        feed_html: PathBuf,

        /// Stop after this many listings (defaults to LEADSCOUT_MAX_RESULTS)
        #[arg(long)]
        max_results: Option<usize>,

        /// Visit each lead's website for email and social links
        #[arg(long)]
        deep_search: bool,

        /// Listings revealed per simulated scroll
        #[arg(long, default_value_t = leadscout_scraper::snapshot::DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },
    /// Suggest business categories for a partial keyword
    Suggest {
        /// Partial keyword; empty lists the first few categories
        #[arg(default_value = "")]
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = leadscout_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Scrape {
            keyword,
            location,
            feed_html,
            max_results,
            deep_search,
            batch_size,
        }) => {
            let args = scrape::ScrapeArgs {
                keyword,
                location,
                feed_html,
                max_results: max_results.unwrap_or(config.max_results),
                deep_search,
                batch_size,
            };
            scrape::run_scrape(&config, args).await?;
        }
        Some(Commands::Suggest { query }) => {
            for keyword in leadscout_core::suggest::suggest(&query) {
                println!("{keyword}");
            }
        }
        None => println!("leadscout: run `leadscout --help` for commands"),
    }

    Ok(())
}
