use std::time::Duration;

use reqwest::Client;
use tokio::runtime::Handle;

use crate::error::ScraperError;

/// Plain HTTP document fetcher used for the enrichment pass.
///
/// The scrape engine is synchronous, so requests are driven to completion on
/// the tokio runtime that was current when the fetcher was built. Call
/// [`PageFetcher::fetch`] only from a blocking thread (e.g. inside
/// `spawn_blocking`), never from async code.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    runtime: Handle,
}

impl PageFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Launch`] when called outside a tokio runtime,
    /// or [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(user_agent: &str) -> Result<Self, ScraperError> {
        let runtime = Handle::try_current()
            .map_err(|e| ScraperError::Launch(format!("no async runtime for fetcher: {e}")))?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, runtime })
    }

    /// Fetches `url` and returns its body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Timeout`] when the whole exchange exceeds `timeout`.
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx response.
    /// - [`ScraperError::Http`] for connection, TLS or body failures.
    pub fn fetch(&self, url: &str, timeout: Duration) -> Result<String, ScraperError> {
        self.runtime.block_on(self.fetch_async(url, timeout))
    }

    async fn fetch_async(&self, url: &str, timeout: Duration) -> Result<String, ScraperError> {
        let timed_out = |e: reqwest::Error| {
            if e.is_timeout() {
                ScraperError::Timeout {
                    url: url.to_owned(),
                    secs: timeout.as_secs(),
                }
            } else {
                ScraperError::Http(e)
            }
        };

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(timed_out)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        response.text().await.map_err(timed_out)
    }
}
