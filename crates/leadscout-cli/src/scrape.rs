//! `scrape` command: replays a saved results page through the scrape engine,
//! streams events to stdout as JSON lines, and saves the final leads.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use leadscout_core::{AppConfig, LogEvent};
use leadscout_scraper::{
    ExtractionRules, HtmlFeedBrowser, LeadScraper, Observer, PageFetcher, RunRegistry,
    ScrapeRequest, ScrapeSettings,
};

#[derive(Debug)]
pub(crate) struct ScrapeArgs {
    pub keyword: String,
    pub location: String,
    pub feed_html: PathBuf,
    pub max_results: usize,
    pub deep_search: bool,
    pub batch_size: usize,
}

/// Prints each event as one JSON line on stdout.
pub(crate) struct ConsoleObserver;

impl Observer for ConsoleObserver {
    async fn deliver(&mut self, event: LogEvent) {
        match serde_json::to_string(&event) {
            Ok(line) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{line}") {
                    tracing::warn!(error = %e, "failed to write event to stdout");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
        }
    }
}

pub(crate) fn load_rules(config: &AppConfig) -> anyhow::Result<ExtractionRules> {
    match &config.rules_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading extraction rules");
            ExtractionRules::load(path)
                .with_context(|| format!("failed to load rules from {}", path.display()))
        }
        None => Ok(ExtractionRules::default()),
    }
}

/// Runs one scrape to completion. Ctrl-C requests a cooperative stop; the
/// leads captured so far are still saved.
///
/// # Errors
///
/// Returns an error for invalid input, unreadable page or rules files, a
/// fatal scrape failure, or when the results cannot be written.
pub(crate) async fn run_scrape(config: &AppConfig, args: ScrapeArgs) -> anyhow::Result<()> {
    let request = ScrapeRequest::new(&args.keyword, &args.location)?
        .with_max_results(args.max_results)
        .with_deep_search(args.deep_search);

    let html = tokio::fs::read_to_string(&args.feed_html)
        .await
        .with_context(|| format!("failed to read {}", args.feed_html.display()))?;

    let rules = load_rules(config)?;
    let scraper = Arc::new(LeadScraper::new(rules, ScrapeSettings::from_config(config))?);
    let fetcher = if args.deep_search {
        Some(PageFetcher::new(&config.user_agent)?)
    } else {
        None
    };
    let batch_size = args.batch_size;

    let registry = RunRegistry::new();
    let handle = registry.start(
        scraper,
        request,
        move || {
            let browser = HtmlFeedBrowser::new(html, batch_size);
            Ok(match fetcher {
                Some(fetcher) => browser.with_fetcher(fetcher),
                None => browser,
            })
        },
        ConsoleObserver,
    )?;

    let wait = handle.wait();
    tokio::pin!(wait);
    let mut listen_for_ctrl_c = true;
    let outcome = loop {
        tokio::select! {
            outcome = &mut wait => break outcome,
            signal = tokio::signal::ctrl_c(), if listen_for_ctrl_c => match signal {
                Ok(()) => {
                    if registry.stop() {
                        eprintln!("Stopping scraper...");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "could not listen for ctrl-c");
                    listen_for_ctrl_c = false;
                }
            },
        }
    };

    let leads = outcome?;
    let saved = crate::output::save_results(&config.output_dir, &leads, chrono::Utc::now())?;
    tracing::info!(
        leads = leads.len(),
        path = %saved.display(),
        "results saved"
    );
    eprintln!("Scrape finished. Results ready.");

    Ok(())
}
