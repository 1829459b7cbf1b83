pub mod bridge;
pub mod browser;
pub mod cancel;
pub mod dedup;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pacing;
pub mod pagination;
pub mod parse;
pub mod session;
pub mod snapshot;

pub use bridge::{Observer, RunHandle, RunRegistry};
pub use browser::Browser;
pub use cancel::StopSignal;
pub use error::{BridgeError, ScraperError};
pub use extract::ExtractionRules;
pub use fetch::PageFetcher;
pub use session::{EventLog, EventSink, LeadScraper, ScrapeRequest, ScrapeSettings};
pub use snapshot::HtmlFeedBrowser;
