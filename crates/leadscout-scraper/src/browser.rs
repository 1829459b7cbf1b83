//! The browser capability the scrape engine drives.
//!
//! Every method is blocking and fallible. Implementations own whatever
//! page/tab state they need; the engine only ever holds [`Browser::Node`]
//! handles for the feed, its listings, and opened detail views.
//!
//! The engine calls these from a single worker thread, so implementations
//! need not be `Send` or `Sync`.

use std::time::Duration;

use crate::error::ScraperError;

pub trait Browser {
    /// Handle to a rendered element: the feed container, a listing card, or
    /// a detail view.
    type Node: Clone;

    /// Runs the search for `query` in `location` and waits for the results
    /// feed.
    ///
    /// # Errors
    ///
    /// [`ScraperError::FeedNotFound`] when the feed never became visible; any
    /// other error is fatal for the run.
    fn open_feed(&mut self, query: &str, location: &str) -> Result<Self::Node, ScraperError>;

    /// Listings currently rendered in the feed, in feed order.
    ///
    /// # Errors
    ///
    /// Propagates DOM access failures.
    fn listings_of(&mut self, feed: &Self::Node) -> Result<Vec<Self::Node>, ScraperError>;

    /// Brings the listing into view, opens it, and returns the detail view.
    ///
    /// # Errors
    ///
    /// Propagates click or navigation failures.
    fn open_detail(&mut self, listing: &Self::Node) -> Result<Self::Node, ScraperError>;

    /// Trimmed text of the first element under `scope` matching `selector`.
    ///
    /// # Errors
    ///
    /// Propagates DOM access failures and invalid selectors. No match is
    /// `Ok(None)`.
    fn text_of(&mut self, scope: &Self::Node, selector: &str)
        -> Result<Option<String>, ScraperError>;

    /// Attribute `attr` of the first element under `scope` matching `selector`.
    ///
    /// # Errors
    ///
    /// As [`Browser::text_of`].
    fn attribute_of(
        &mut self,
        scope: &Self::Node,
        selector: &str,
        attr: &str,
    ) -> Result<Option<String>, ScraperError>;

    /// Attribute `attr` of up to `limit` matching elements, in document order.
    /// Elements without the attribute are skipped.
    ///
    /// # Errors
    ///
    /// As [`Browser::text_of`].
    fn attributes_of(
        &mut self,
        scope: &Self::Node,
        selector: &str,
        attr: &str,
        limit: usize,
    ) -> Result<Vec<String>, ScraperError>;

    /// Visible text of `scope`, one line per rendered block.
    ///
    /// # Errors
    ///
    /// Propagates DOM access failures.
    fn inner_text(&mut self, scope: &Self::Node) -> Result<String, ScraperError>;

    /// Scrolls the feed to its end so the page loads more listings.
    ///
    /// # Errors
    ///
    /// Propagates script or DOM failures.
    fn scroll_to_bottom(&mut self, feed: &Self::Node) -> Result<(), ScraperError>;

    /// Loads `url` in a context isolated from the feed page and returns the
    /// raw document body.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Timeout`] past `timeout`, or any navigation failure.
    fn fetch_document(&mut self, url: &str, timeout: Duration) -> Result<String, ScraperError>;
}
