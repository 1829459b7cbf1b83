//! Field extraction through ordered fallback chains.
//!
//! Each field is a list of [`Strategy`] values tried in order; the first one
//! producing non-blank text wins. Chains are plain data, so a new fallback
//! selector is a rules-file change rather than a code change. An exhausted
//! chain is `None`, not an error. Browser failures, on the other hand,
//! propagate so the session can skip the listing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::browser::Browser;
use crate::error::ScraperError;

/// Which element a strategy reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The listing card in the feed.
    Card,
    /// The detail view opened for the listing.
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Text content of the first match.
    Text { scope: Scope, selector: String },
    /// One attribute of the first match.
    Attribute {
        scope: Scope,
        selector: String,
        attr: String,
    },
    /// First of up to `limit` attribute values that mentions one of the
    /// rules' rating keywords.
    Labelled {
        scope: Scope,
        selector: String,
        attr: String,
        limit: usize,
    },
    /// First non-blank line of the element's visible text.
    FirstLine { scope: Scope },
}

impl Strategy {
    fn scope(&self) -> Scope {
        match self {
            Self::Text { scope, .. }
            | Self::Attribute { scope, .. }
            | Self::Labelled { scope, .. }
            | Self::FirstLine { scope } => *scope,
        }
    }
}

/// Site-specific extraction data.
///
/// Loadable from YAML; fields missing from the file keep their defaults:
///
/// ```yaml
/// phone:
///   - kind: text
///     scope: detail
///     selector: "button[data-item-id^='phone:']"
/// social_domains: [instagram.com, facebook.com, linkedin.com, x.com]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    pub name: Vec<Strategy>,
    pub phone: Vec<Strategy>,
    pub website: Vec<Strategy>,
    pub rating_caption: Vec<Strategy>,
    /// Lower-case fragments that mark an attribute as a rating caption.
    pub rating_keywords: Vec<String>,
    /// Domains whose profile URLs the enrichment pass collects.
    pub social_domains: Vec<String>,
}

const RATING_LABEL_SELECTOR: &str = "[aria-label*='stars'], [aria-label*='reviews'], \
     [aria-label*='étoile'], [aria-label*='etoile'], [aria-label*='avis']";

const DETAIL_RATING_LABEL_SELECTOR: &str = "div[role='main'] [aria-label*='stars'], \
     div[role='main'] [aria-label*='reviews'], div[role='main'] [aria-label*='étoile'], \
     div[role='main'] [aria-label*='etoile'], div[role='main'] [aria-label*='avis']";

impl Default for ExtractionRules {
    fn default() -> Self {
        let text = |scope, selector: &str| Strategy::Text {
            scope,
            selector: selector.to_owned(),
        };
        let attribute = |selector: &str, attr: &str| Strategy::Attribute {
            scope: Scope::Detail,
            selector: selector.to_owned(),
            attr: attr.to_owned(),
        };
        Self {
            name: vec![
                text(Scope::Detail, "h1.DUwDvf"),
                text(Scope::Detail, "h1[aria-level='1']"),
                Strategy::FirstLine { scope: Scope::Card },
            ],
            phone: vec![
                text(Scope::Detail, "button[data-item-id^='phone:']"),
                text(Scope::Detail, "button[data-item-id*='phone']"),
            ],
            website: vec![
                attribute("a[data-item-id='authority']", "href"),
                attribute("button[data-item-id='authority']", "data-url"),
            ],
            rating_caption: vec![
                Strategy::Labelled {
                    scope: Scope::Card,
                    selector: RATING_LABEL_SELECTOR.to_owned(),
                    attr: "aria-label".to_owned(),
                    limit: 3,
                },
                Strategy::Labelled {
                    scope: Scope::Detail,
                    selector: DETAIL_RATING_LABEL_SELECTOR.to_owned(),
                    attr: "aria-label".to_owned(),
                    limit: 5,
                },
            ],
            rating_keywords: ["star", "review", "étoile", "etoile", "avis"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            social_domains: ["instagram.com", "facebook.com", "linkedin.com"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl ExtractionRules {
    /// Loads rules from a YAML file, filling unspecified fields from the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::RulesFileIo`] or [`ScraperError::RulesFileParse`]
    /// when the file cannot be read or parsed, and [`ScraperError::InvalidRules`]
    /// when the name chain is empty.
    pub fn load(path: &Path) -> Result<Self, ScraperError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScraperError::RulesFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// # Errors
    ///
    /// As [`ExtractionRules::load`], minus the IO case.
    pub fn from_yaml(content: &str) -> Result<Self, ScraperError> {
        let rules: Self = serde_yaml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    fn validate(&self) -> Result<(), ScraperError> {
        if self.name.is_empty() {
            return Err(ScraperError::InvalidRules(
                "name chain must contain at least one strategy".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Raw, best-effort values read from one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFields {
    pub name: Option<String>,
    /// As displayed; cleaned later.
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating_caption: Option<String>,
}

pub struct FieldExtractor<'r> {
    rules: &'r ExtractionRules,
}

impl<'r> FieldExtractor<'r> {
    #[must_use]
    pub fn new(rules: &'r ExtractionRules) -> Self {
        Self { rules }
    }

    /// Runs every field chain against one listing.
    ///
    /// # Errors
    ///
    /// Propagates the first browser failure; absent fields are `None`.
    pub fn extract<B: Browser>(
        &self,
        browser: &mut B,
        card: &B::Node,
        detail: &B::Node,
    ) -> Result<ListingFields, ScraperError> {
        Ok(ListingFields {
            name: self.first_match(browser, card, detail, &self.rules.name)?,
            phone: self.first_match(browser, card, detail, &self.rules.phone)?,
            website: self.first_match(browser, card, detail, &self.rules.website)?,
            rating_caption: self.first_match(browser, card, detail, &self.rules.rating_caption)?,
        })
    }

    /// Evaluates `chain` in order and returns the first non-blank value.
    ///
    /// # Errors
    ///
    /// Propagates browser failures.
    pub fn first_match<B: Browser>(
        &self,
        browser: &mut B,
        card: &B::Node,
        detail: &B::Node,
        chain: &[Strategy],
    ) -> Result<Option<String>, ScraperError> {
        for strategy in chain {
            let target = match strategy.scope() {
                Scope::Card => card,
                Scope::Detail => detail,
            };
            if let Some(value) = self.evaluate(browser, target, strategy)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn evaluate<B: Browser>(
        &self,
        browser: &mut B,
        target: &B::Node,
        strategy: &Strategy,
    ) -> Result<Option<String>, ScraperError> {
        let raw = match strategy {
            Strategy::Text { selector, .. } => browser.text_of(target, selector)?,
            Strategy::Attribute { selector, attr, .. } => {
                browser.attribute_of(target, selector, attr)?
            }
            Strategy::Labelled {
                selector,
                attr,
                limit,
                ..
            } => browser
                .attributes_of(target, selector, attr, *limit)?
                .into_iter()
                .find(|label| self.mentions_rating(label)),
            Strategy::FirstLine { .. } => browser
                .inner_text(target)?
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_owned),
        };
        Ok(non_blank(raw))
    }

    fn mentions_rating(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        self.rules
            .rating_keywords
            .iter()
            .any(|keyword| lower.contains(keyword.as_str()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
