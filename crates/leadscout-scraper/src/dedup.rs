use std::collections::HashSet;

use leadscout_core::Lead;

const KEY_SEPARATOR: char = '|';

/// Composite identity of a lead within one session: name, phone and website
/// joined by `|`, with absent parts left empty.
#[must_use]
pub fn identity_key(name: &str, phone: Option<&str>, website: Option<&str>) -> String {
    let phone = phone.unwrap_or_default();
    let website = website.unwrap_or_default();
    format!("{name}{KEY_SEPARATOR}{phone}{KEY_SEPARATOR}{website}")
}

/// Rejects leads already seen in this session. First occurrence wins.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the candidate's key and returns `true` the first time it is
    /// seen, `false` for every repeat.
    pub fn accept(&mut self, candidate: &Lead) -> bool {
        self.seen.insert(identity_key(
            &candidate.name,
            candidate.phone.as_deref(),
            candidate.website.as_deref(),
        ))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
