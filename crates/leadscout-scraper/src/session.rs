//! One scrape run: pagination, extraction, dedup and enrichment wired
//! together, with every step reported through an [`EventSink`].
//!
//! Failure handling follows a strict ladder. A missing field is `None`. A
//! listing that throws is reported and skipped. A failed enrichment fetch
//! leaves the lead without email. A feed that never appears ends the run
//! with no leads. Only a browser launch or feed-level failure aborts the
//! run with an error. Whatever happens, [`LeadScraper::run`] emits exactly
//! one [`LogEvent::Done`] last.

use std::sync::Mutex;
use std::time::Duration;

use leadscout_core::{AppConfig, Lead, LogEvent};
use tokio::sync::mpsc::UnboundedSender;

use crate::browser::Browser;
use crate::cancel::StopSignal;
use crate::dedup::Deduplicator;
use crate::enrich::{Enricher, Enrichment};
use crate::error::ScraperError;
use crate::extract::{ExtractionRules, FieldExtractor};
use crate::pacing::Pacing;
use crate::pagination::{PaginationState, Paginator, Step, DEFAULT_STAGNATION_ROUNDS};
use crate::parse::{clean_phone, parse_rating_and_reviews};

pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Destination for run events. Must not block beyond queueing.
pub trait EventSink {
    fn emit(&self, event: LogEvent);
}

impl EventSink for UnboundedSender<LogEvent> {
    fn emit(&self, event: LogEvent) {
        // A closed receiver means nobody is listening any more; the run
        // still completes and returns its leads.
        let _ = self.send(event);
    }
}

/// In-memory sink for synchronous callers.
#[derive(Debug, Default)]
pub struct EventLog(Mutex<Vec<LogEvent>>);

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.0
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: LogEvent) {
        if let Ok(mut events) = self.0.lock() {
            events.push(event);
        }
    }
}

/// What to scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub query: String,
    pub location: String,
    pub max_results: usize,
    /// Visit each lead's website for email and social links.
    pub deep_search: bool,
}

impl ScrapeRequest {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidRequest`] when the keyword or location
    /// is blank.
    pub fn new(query: &str, location: &str) -> Result<Self, ScraperError> {
        let query = query.trim();
        let location = location.trim();
        if query.is_empty() || location.is_empty() {
            return Err(ScraperError::InvalidRequest(
                "Keyword and location are required.".to_owned(),
            ));
        }
        Ok(Self {
            query: query.to_owned(),
            location: location.to_owned(),
            max_results: DEFAULT_MAX_RESULTS,
            deep_search: false,
        })
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn with_deep_search(mut self, deep_search: bool) -> Self {
        self.deep_search = deep_search;
        self
    }
}

/// Engine tuning shared by every run.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub stagnation_rounds: u32,
    pub pacing: Pacing,
    pub enrich_timeout: Duration,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            stagnation_rounds: DEFAULT_STAGNATION_ROUNDS,
            pacing: Pacing::default(),
            enrich_timeout: Duration::from_secs(30),
        }
    }
}

impl ScrapeSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            stagnation_rounds: config.stagnation_rounds,
            pacing: Pacing::from_config(config),
            enrich_timeout: config.enrich_timeout(),
        }
    }
}

/// Mutable state of one run. Dropped when the run ends.
struct ScrapeSession {
    paginator: Paginator,
    dedup: Deduplicator,
    leads: Vec<Lead>,
}

/// Reusable scrape engine; each [`LeadScraper::run`] call is one session.
pub struct LeadScraper {
    rules: ExtractionRules,
    settings: ScrapeSettings,
    enricher: Enricher,
}

impl LeadScraper {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidPattern`] if the rules' social domains
    /// cannot form a valid pattern.
    pub fn new(rules: ExtractionRules, settings: ScrapeSettings) -> Result<Self, ScraperError> {
        let enricher = Enricher::new(
            &rules.social_domains,
            settings.enrich_timeout,
            settings.pacing.enrich,
        )?;
        Ok(Self {
            rules,
            settings,
            enricher,
        })
    }

    /// Runs one scrape to completion and returns the accepted leads in
    /// capture order.
    ///
    /// Emits [`LogEvent::Done`] exactly once, as the last event, on every
    /// path. A fatal error is additionally reported as a status event
    /// before `Done`.
    ///
    /// # Errors
    ///
    /// Returns the fatal [`ScraperError`] when the feed cannot be opened for
    /// a reason other than it simply not appearing.
    pub fn run<B: Browser>(
        &self,
        browser: &mut B,
        request: &ScrapeRequest,
        stop: &StopSignal,
        sink: &dyn EventSink,
    ) -> Result<Vec<Lead>, ScraperError> {
        let outcome = self.drive(browser, request, stop, sink);
        if let Err(e) = &outcome {
            tracing::error!(error = %e, "scrape aborted");
            sink.emit(LogEvent::status(format!("Scrape failed: {e}")));
        }
        sink.emit(LogEvent::Done);
        outcome
    }

    fn drive<B: Browser>(
        &self,
        browser: &mut B,
        request: &ScrapeRequest,
        stop: &StopSignal,
        sink: &dyn EventSink,
    ) -> Result<Vec<Lead>, ScraperError> {
        status(sink, "Opening results feed...");
        let feed = match browser.open_feed(&request.query, &request.location) {
            Ok(feed) => feed,
            Err(ScraperError::FeedNotFound { .. }) => {
                status(sink, "No results feed found.");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut session = ScrapeSession {
            paginator: Paginator::new(request.max_results, self.settings.stagnation_rounds),
            dedup: Deduplicator::new(),
            leads: Vec::new(),
        };
        let mut listings = refresh_listings(browser, &feed, Vec::new());

        loop {
            match session
                .paginator
                .next_step(listings.len(), stop.is_requested())
            {
                Step::Process(index) => {
                    if let Err(e) =
                        self.process_listing(browser, &listings[index], request, &mut session, sink)
                    {
                        tracing::warn!(index, error = %e, "listing skipped");
                        sink.emit(LogEvent::status(format!("Lead extraction failed: {e}")));
                    }
                }
                Step::Scroll { page } => {
                    let scroll = browser.scroll_to_bottom(&feed);
                    self.settings.pacing.scroll.pause();
                    // A failed scroll still counts as a round, so stagnation
                    // ends a feed that can no longer scroll.
                    session.paginator.scrolled();
                    match scroll {
                        Ok(()) => {
                            tracing::debug!(page, "feed scrolled");
                            sink.emit(LogEvent::Progress { page });
                        }
                        Err(e) => {
                            tracing::warn!(page, error = %e, "feed scroll failed");
                            sink.emit(LogEvent::status(format!("Feed scroll failed: {e}")));
                        }
                    }
                    listings = refresh_listings(browser, &feed, listings);
                }
                Step::Stop(state) => {
                    match state {
                        PaginationState::Cancelled => status(sink, "Scrape stopped by user."),
                        PaginationState::Capped => tracing::info!(
                            max_results = request.max_results,
                            "result cap reached"
                        ),
                        _ => tracing::info!(
                            visited = session.paginator.current_index(),
                            "feed exhausted"
                        ),
                    }
                    break;
                }
            }
        }

        tracing::info!(leads = session.leads.len(), "scrape finished");
        Ok(session.leads)
    }

    fn process_listing<B: Browser>(
        &self,
        browser: &mut B,
        card: &B::Node,
        request: &ScrapeRequest,
        session: &mut ScrapeSession,
        sink: &dyn EventSink,
    ) -> Result<(), ScraperError> {
        let detail = browser.open_detail(card)?;
        if !self.settings.pacing.detail_settle.is_zero() {
            std::thread::sleep(self.settings.pacing.detail_settle);
        }

        let fields = FieldExtractor::new(&self.rules).extract(browser, card, &detail)?;

        let (mut rating, mut review_count) = fields
            .rating_caption
            .as_deref()
            .map_or((None, None), parse_rating_and_reviews);
        if rating.is_none() && review_count.is_none() {
            (rating, review_count) = parse_rating_and_reviews(&browser.inner_text(card)?);
        }

        let phone = fields.phone.as_deref().and_then(clean_phone);
        let website = fields.website;
        if website.is_none() {
            status(sink, "Website not found");
        }

        let Some(name) = fields.name else {
            tracing::debug!("listing has no name; skipped");
            return Ok(());
        };

        let mut lead = Lead {
            name: name.clone(),
            phone,
            website,
            rating,
            review_count,
            social_links: None,
            email: None,
        };
        if !session.dedup.accept(&lead) {
            tracing::debug!(name = %name, "duplicate listing skipped");
            return Ok(());
        }

        let enrichment = match (&lead.website, request.deep_search) {
            (Some(site), true) => self.enricher.enrich(browser, site),
            _ => Enrichment::default(),
        };
        lead.social_links =
            (!enrichment.social_links.is_empty()).then(|| enrichment.social_links.clone());
        lead.email.clone_from(&enrichment.email);
        session.leads.push(lead.clone());

        status(sink, format!("Captured: {name}"));
        sink.emit(LogEvent::Lead(lead));
        if request.deep_search {
            sink.emit(LogEvent::Enrich {
                name,
                email: enrichment.email,
                social_links: enrichment.social_links,
            });
        }
        Ok(())
    }
}

/// Re-reads the rendered listings. On failure keeps the previous snapshot so
/// the stagnation counter, not an error, ends a broken feed.
fn refresh_listings<B: Browser>(
    browser: &mut B,
    feed: &B::Node,
    previous: Vec<B::Node>,
) -> Vec<B::Node> {
    match browser.listings_of(feed) {
        Ok(listings) => listings,
        Err(e) => {
            tracing::warn!(error = %e, "could not read feed listings");
            previous
        }
    }
}

fn status(sink: &dyn EventSink, message: impl Into<String>) {
    let message = message.into();
    tracing::info!("{message}");
    sink.emit(LogEvent::Status(message));
}
