//! Website pass for deep-search runs: one email address and any social
//! profile links found on the lead's own site.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::browser::Browser;
use crate::error::ScraperError;
use crate::pacing::Jitter;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

/// What the website pass found. Both parts may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub email: Option<String>,
    /// First-seen order, no duplicates.
    pub social_links: Vec<String>,
}

pub struct Enricher {
    timeout: Duration,
    delay: Jitter,
    social_re: Option<Regex>,
}

impl Enricher {
    /// Builds an enricher collecting profile URLs under `social_domains`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidPattern`] if the domain pattern cannot
    /// be compiled.
    pub fn new(
        social_domains: &[String],
        timeout: Duration,
        delay: Jitter,
    ) -> Result<Self, ScraperError> {
        let social_re = if social_domains.is_empty() {
            None
        } else {
            let alternation = social_domains
                .iter()
                .map(|d| regex::escape(d.trim()))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(
                r#"(?i)https?://(?:www\.)?(?:{alternation})/[^"'\s>]+"#
            ))?)
        };
        Ok(Self {
            timeout,
            delay,
            social_re,
        })
    }

    /// Fetches `website` and scans it. Never fails: any fetch error yields an
    /// empty [`Enrichment`].
    pub fn enrich<B: Browser>(&self, browser: &mut B, website: &str) -> Enrichment {
        match browser.fetch_document(website, self.timeout) {
            Ok(document) => {
                self.delay.pause();
                self.scan(&document)
            }
            Err(e) => {
                tracing::debug!(website, error = %e, "enrichment fetch failed");
                Enrichment::default()
            }
        }
    }

    /// Scans a fetched document for the first email and all social links.
    #[must_use]
    pub fn scan(&self, document: &str) -> Enrichment {
        let email = EMAIL_RE.find(document).map(|m| m.as_str().to_owned());

        let mut social_links: Vec<String> = Vec::new();
        if let Some(re) = &self.social_re {
            for m in re.find_iter(document) {
                let link = m.as_str();
                if !social_links.iter().any(|seen| seen == link) {
                    social_links.push(link.to_owned());
                }
            }
        }

        Enrichment {
            email,
            social_links,
        }
    }
}
