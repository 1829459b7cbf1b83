//! [`Browser`] over a saved results page.
//!
//! The page is parsed once; every `div[role='article']` inside the
//! `div[role='feed']` container becomes one listing card. Cards are revealed
//! in batches, one batch per scroll, mimicking a feed that lazy-loads as it
//! is scrolled. A card doubles as its own detail view, so selectors written
//! for the live detail pane also resolve against the card markup.

use std::collections::HashMap;
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};

use crate::browser::Browser;
use crate::error::ScraperError;
use crate::fetch::PageFetcher;

const FEED_SELECTOR: &str = "div[role='feed']";
const CARD_SELECTOR: &str = "div[role='article']";

pub const DEFAULT_BATCH_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotNode {
    Feed,
    Card(usize),
}

pub struct HtmlFeedBrowser {
    source: String,
    batch_size: usize,
    fetcher: Option<PageFetcher>,
    cards: Vec<Html>,
    revealed: usize,
    selectors: HashMap<String, Selector>,
}

impl HtmlFeedBrowser {
    /// `batch_size` is clamped to at least one card per scroll.
    #[must_use]
    pub fn new(source: impl Into<String>, batch_size: usize) -> Self {
        Self {
            source: source.into(),
            batch_size: batch_size.max(1),
            fetcher: None,
            cards: Vec::new(),
            revealed: 0,
            selectors: HashMap::new(),
        }
    }

    /// Enables [`Browser::fetch_document`] for deep-search runs.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: PageFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    fn selector(&mut self, selector: &str) -> Result<Selector, ScraperError> {
        if let Some(parsed) = self.selectors.get(selector) {
            return Ok(parsed.clone());
        }
        let parsed = Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
            selector: selector.to_owned(),
            reason: e.to_string(),
        })?;
        self.selectors.insert(selector.to_owned(), parsed.clone());
        Ok(parsed)
    }

    fn card(&self, node: SnapshotNode, operation: &'static str) -> Result<&Html, ScraperError> {
        match node {
            SnapshotNode::Card(index) if index < self.revealed => self
                .cards
                .get(index)
                .ok_or_else(|| ScraperError::browser(operation, format!("no card {index}"))),
            SnapshotNode::Card(index) => Err(ScraperError::browser(
                operation,
                format!("card {index} is not rendered yet"),
            )),
            SnapshotNode::Feed => Err(ScraperError::browser(
                operation,
                "expected a listing, got the feed",
            )),
        }
    }

    fn matches<'a>(
        &'a self,
        scope: SnapshotNode,
        selector: &'a Selector,
        operation: &'static str,
    ) -> Result<impl Iterator<Item = ElementRef<'a>> + 'a, ScraperError> {
        Ok(self.card(scope, operation)?.select(selector))
    }
}

impl Browser for HtmlFeedBrowser {
    type Node = SnapshotNode;

    fn open_feed(&mut self, query: &str, location: &str) -> Result<SnapshotNode, ScraperError> {
        tracing::debug!(query, location, "opening snapshot feed");
        let feed_selector = self.selector(FEED_SELECTOR)?;
        let card_selector = self.selector(CARD_SELECTOR)?;

        let document = Html::parse_document(&self.source);
        let Some(feed) = document.select(&feed_selector).next() else {
            return Err(ScraperError::FeedNotFound {
                query: query.to_owned(),
                location: location.to_owned(),
            });
        };

        self.cards = feed
            .select(&card_selector)
            .map(|card| Html::parse_fragment(&card.html()))
            .collect();
        self.revealed = self.batch_size.min(self.cards.len());
        tracing::debug!(
            cards = self.cards.len(),
            revealed = self.revealed,
            "snapshot feed parsed"
        );
        Ok(SnapshotNode::Feed)
    }

    fn listings_of(&mut self, feed: &SnapshotNode) -> Result<Vec<SnapshotNode>, ScraperError> {
        if *feed != SnapshotNode::Feed {
            return Err(ScraperError::browser("listings_of", "scope is not the feed"));
        }
        Ok((0..self.revealed).map(SnapshotNode::Card).collect())
    }

    fn open_detail(&mut self, listing: &SnapshotNode) -> Result<SnapshotNode, ScraperError> {
        self.card(*listing, "open_detail")?;
        Ok(*listing)
    }

    fn text_of(
        &mut self,
        scope: &SnapshotNode,
        selector: &str,
    ) -> Result<Option<String>, ScraperError> {
        let selector = self.selector(selector)?;
        let found = self
            .matches(*scope, &selector, "text_of")?
            .next()
            .map(|el| el.text().collect::<String>().trim().to_owned());
        Ok(found)
    }

    fn attribute_of(
        &mut self,
        scope: &SnapshotNode,
        selector: &str,
        attr: &str,
    ) -> Result<Option<String>, ScraperError> {
        let selector = self.selector(selector)?;
        let found = self
            .matches(*scope, &selector, "attribute_of")?
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(str::to_owned);
        Ok(found)
    }

    fn attributes_of(
        &mut self,
        scope: &SnapshotNode,
        selector: &str,
        attr: &str,
        limit: usize,
    ) -> Result<Vec<String>, ScraperError> {
        let selector = self.selector(selector)?;
        let found = self
            .matches(*scope, &selector, "attributes_of")?
            .filter_map(|el| el.value().attr(attr).map(str::to_owned))
            .take(limit)
            .collect();
        Ok(found)
    }

    fn inner_text(&mut self, scope: &SnapshotNode) -> Result<String, ScraperError> {
        let card = self.card(*scope, "inner_text")?;
        Ok(card
            .root_element()
            .text()
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn scroll_to_bottom(&mut self, feed: &SnapshotNode) -> Result<(), ScraperError> {
        if *feed != SnapshotNode::Feed {
            return Err(ScraperError::browser("scroll_to_bottom", "scope is not the feed"));
        }
        self.revealed = (self.revealed + self.batch_size).min(self.cards.len());
        Ok(())
    }

    fn fetch_document(&mut self, url: &str, timeout: Duration) -> Result<String, ScraperError> {
        match &self.fetcher {
            Some(fetcher) => fetcher.fetch(url, timeout),
            None => Err(ScraperError::browser(
                "fetch_document",
                "no page fetcher configured",
            )),
        }
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
