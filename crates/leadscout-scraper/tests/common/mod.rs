//! Scripted [`Browser`] shared by the integration tests.
//!
//! Listings are revealed `batch` at a time, one batch per scroll. Field
//! lookups answer the default extraction rules' selectors from the scripted
//! listing data.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use leadscout_scraper::pacing::Pacing;
use leadscout_scraper::{Browser, ScrapeSettings, ScraperError, StopSignal};

#[derive(Debug, Clone, Default)]
pub struct FakeListing {
    pub name: Option<String>,
    pub card_text: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub caption: Option<String>,
    pub fail_detail: bool,
}

impl FakeListing {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_owned()),
            card_text: format!("{name}\nDentist"),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_owned());
        self
    }

    pub fn with_website(mut self, website: &str) -> Self {
        self.website = Some(website.to_owned());
        self
    }

    pub fn with_caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_owned());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_detail = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeNode {
    Feed,
    Card(usize),
    Detail(usize),
}

pub enum FeedBehaviour {
    Present,
    Missing,
    Broken,
}

pub enum Page {
    Body(String),
    TimesOut,
}

pub struct FakeBrowser {
    pub listings: Vec<FakeListing>,
    pub batch: usize,
    pub revealed: usize,
    pub feed: FeedBehaviour,
    pub pages: HashMap<String, Page>,
    pub fetched: Vec<String>,
    pub scrolls: usize,
    /// Requests `stop` once this many details have been opened.
    pub stop_after: Option<(usize, StopSignal)>,
    /// Every `scroll_to_bottom` call fails without revealing listings.
    pub fail_scroll: bool,
    /// `listings_of` fails once the feed has been scrolled.
    pub fail_listings_after_scroll: bool,
    opened: usize,
}

impl FakeBrowser {
    pub fn new(listings: Vec<FakeListing>, batch: usize) -> Self {
        Self {
            listings,
            batch,
            revealed: 0,
            feed: FeedBehaviour::Present,
            pages: HashMap::new(),
            fetched: Vec::new(),
            scrolls: 0,
            stop_after: None,
            fail_scroll: false,
            fail_listings_after_scroll: false,
            opened: 0,
        }
    }

    pub fn with_feed(mut self, feed: FeedBehaviour) -> Self {
        self.feed = feed;
        self
    }

    pub fn with_page(mut self, url: &str, page: Page) -> Self {
        self.pages.insert(url.to_owned(), page);
        self
    }

    pub fn stopping_after(mut self, details: usize, stop: StopSignal) -> Self {
        self.stop_after = Some((details, stop));
        self
    }

    pub fn failing_scroll(mut self) -> Self {
        self.fail_scroll = true;
        self
    }

    pub fn failing_listings_after_scroll(mut self) -> Self {
        self.fail_listings_after_scroll = true;
        self
    }

    fn listing(&self, node: FakeNode) -> Result<&FakeListing, ScraperError> {
        match node {
            FakeNode::Card(i) | FakeNode::Detail(i) => self
                .listings
                .get(i)
                .ok_or_else(|| ScraperError::browser("lookup", format!("no listing {i}"))),
            FakeNode::Feed => Err(ScraperError::browser("lookup", "feed is not a listing")),
        }
    }
}

impl Browser for FakeBrowser {
    type Node = FakeNode;

    fn open_feed(&mut self, query: &str, location: &str) -> Result<FakeNode, ScraperError> {
        match self.feed {
            FeedBehaviour::Present => {
                self.revealed = self.batch.min(self.listings.len());
                Ok(FakeNode::Feed)
            }
            FeedBehaviour::Missing => Err(ScraperError::FeedNotFound {
                query: query.to_owned(),
                location: location.to_owned(),
            }),
            FeedBehaviour::Broken => Err(ScraperError::browser("open_feed", "page crashed")),
        }
    }

    fn listings_of(&mut self, _feed: &FakeNode) -> Result<Vec<FakeNode>, ScraperError> {
        if self.fail_listings_after_scroll && self.scrolls > 0 {
            return Err(ScraperError::browser("listings_of", "feed detached"));
        }
        Ok((0..self.revealed).map(FakeNode::Card).collect())
    }

    fn open_detail(&mut self, listing: &FakeNode) -> Result<FakeNode, ScraperError> {
        self.opened += 1;
        if let Some((after, stop)) = &self.stop_after {
            if self.opened >= *after {
                stop.request();
            }
        }
        let FakeNode::Card(i) = *listing else {
            return Err(ScraperError::browser("open_detail", "not a card"));
        };
        if self.listing(*listing)?.fail_detail {
            return Err(ScraperError::browser("open_detail", "click intercepted"));
        }
        Ok(FakeNode::Detail(i))
    }

    fn text_of(&mut self, scope: &FakeNode, selector: &str) -> Result<Option<String>, ScraperError> {
        if !matches!(scope, FakeNode::Detail(_)) {
            return Ok(None);
        }
        let listing = self.listing(*scope)?;
        if selector.starts_with("h1.") {
            Ok(listing.name.clone())
        } else if selector.contains("phone") {
            Ok(listing.phone.clone())
        } else {
            Ok(None)
        }
    }

    fn attribute_of(
        &mut self,
        scope: &FakeNode,
        selector: &str,
        attr: &str,
    ) -> Result<Option<String>, ScraperError> {
        if !matches!(scope, FakeNode::Detail(_)) {
            return Ok(None);
        }
        let listing = self.listing(*scope)?;
        if selector.contains("authority") && attr == "href" {
            Ok(listing.website.clone())
        } else {
            Ok(None)
        }
    }

    fn attributes_of(
        &mut self,
        scope: &FakeNode,
        _selector: &str,
        attr: &str,
        _limit: usize,
    ) -> Result<Vec<String>, ScraperError> {
        if !matches!(scope, FakeNode::Card(_)) || attr != "aria-label" {
            return Ok(Vec::new());
        }
        Ok(self.listing(*scope)?.caption.iter().cloned().collect())
    }

    fn inner_text(&mut self, scope: &FakeNode) -> Result<String, ScraperError> {
        Ok(self.listing(*scope)?.card_text.clone())
    }

    fn scroll_to_bottom(&mut self, _feed: &FakeNode) -> Result<(), ScraperError> {
        self.scrolls += 1;
        if self.fail_scroll {
            return Err(ScraperError::browser("scroll_to_bottom", "feed detached"));
        }
        self.revealed = (self.revealed + self.batch).min(self.listings.len());
        Ok(())
    }

    fn fetch_document(&mut self, url: &str, timeout: Duration) -> Result<String, ScraperError> {
        self.fetched.push(url.to_owned());
        match self.pages.get(url) {
            Some(Page::Body(body)) => Ok(body.clone()),
            Some(Page::TimesOut) => Err(ScraperError::Timeout {
                url: url.to_owned(),
                secs: timeout.as_secs(),
            }),
            None => Err(ScraperError::UnexpectedStatus {
                status: 404,
                url: url.to_owned(),
            }),
        }
    }
}

/// No pauses, three stagnant rounds, one-second enrichment timeout.
pub fn fast_settings() -> ScrapeSettings {
    ScrapeSettings {
        stagnation_rounds: 3,
        pacing: Pacing::immediate(),
        enrich_timeout: Duration::from_secs(1),
    }
}

/// `count` distinct dentists with phones, websites and ratings.
pub fn dentists(count: usize) -> Vec<FakeListing> {
    (0..count)
        .map(|i| {
            FakeListing::named(&format!("Dentist {i}"))
                .with_phone(&format!("+1 (303) 555-{i:04}"))
                .with_website(&format!("https://dentist{i}.test"))
                .with_caption(&format!("4.{} stars {} Reviews", i % 10, 10 + i))
        })
        .collect()
}
