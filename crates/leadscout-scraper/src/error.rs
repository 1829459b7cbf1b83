use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    /// The browser (or its HTTP side channel) could not be started. Fatal for
    /// the run.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// The results feed never became visible for the query.
    #[error("no results feed found for \"{query}\" in \"{location}\"")]
    FeedNotFound { query: String, location: String },

    /// A DOM or navigation call failed.
    #[error("browser error during {operation}: {reason}")]
    Browser {
        operation: &'static str,
        reason: String,
    },

    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("timed out after {secs}s fetching {url}")]
    Timeout { url: String, secs: u64 },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("failed to read rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),

    #[error("invalid extraction rules: {0}")]
    InvalidRules(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("scrape worker stopped unexpectedly: {0}")]
    WorkerPanicked(String),
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("A scrape is already running.")]
    AlreadyRunning { run_id: uuid::Uuid },
}

impl ScraperError {
    pub fn browser(operation: &'static str, reason: impl ToString) -> Self {
        Self::Browser {
            operation,
            reason: reason.to_string(),
        }
    }
}
