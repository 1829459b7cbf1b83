use serde::{Deserialize, Serialize};

/// One business captured from the results feed.
///
/// Only `name` is guaranteed; every other field is best-effort and stays
/// `None` when the listing did not expose it. A `Lead` is never modified
/// after it has been emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Star rating as displayed, usually within `0.0..=5.0`.
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    /// Social profile URLs in first-seen order. `None` rather than an empty
    /// list when nothing was found.
    pub social_links: Option<Vec<String>>,
    pub email: Option<String>,
}
