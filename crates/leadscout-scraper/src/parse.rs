//! Pure text parsers for listing captions and phone numbers.
//!
//! Both entry points are total: malformed input degrades to `None`, never to
//! an error or a panic.

use std::sync::LazyLock;

use regex::Regex;

/// `"4.8 stars"`, `"4,5 étoiles"`.
static RATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+[.,]?[0-9]*)\s*(?:stars?|étoiles?|etoiles?)").expect("valid rating regex")
});

/// `"213 reviews"`, `"1,204 avis"`.
static REVIEWS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9][0-9,]*)\s*(?:reviews?|avis)").expect("valid reviews regex")
});

/// Compact card form: `"4.6(1,024)"`.
static INLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+[.,]?[0-9]*)\s*\(([^)]+)\)").expect("valid inline rating regex")
});

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9,]*").expect("valid count regex"));

/// Extracts `(rating, review_count)` from a rating caption or card text.
///
/// Tries the labelled forms first (`"<n> stars"`, `"<n> reviews"` and their
/// French variants). Only when neither labelled form is present does it fall
/// back to the inline `"<rating> (<count>)"` form.
///
/// Ratings accept a comma as the decimal separator; counts treat commas as
/// thousands separators.
#[must_use]
pub fn parse_rating_and_reviews(caption: &str) -> (Option<f64>, Option<u32>) {
    let rating_token = RATING_RE
        .captures(caption)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    let count_token = REVIEWS_RE
        .captures(caption)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());

    if rating_token.is_some() || count_token.is_some() {
        return (
            rating_token.and_then(parse_rating),
            count_token.and_then(parse_count),
        );
    }

    let Some(inline) = INLINE_RE.captures(caption) else {
        return (None, None);
    };
    let rating = inline.get(1).and_then(|m| parse_rating(m.as_str()));
    let count = inline
        .get(2)
        .and_then(|m| COUNT_RE.find(m.as_str()))
        .and_then(|m| parse_count(m.as_str()));
    (rating, count)
}

/// Normalizes a displayed phone number to digit groups separated by single
/// spaces, keeping one leading `+` for international numbers.
///
/// `"Call: (555) 123-4567!"` becomes `"555 123 4567"`. Returns `None` when no
/// digits remain. Idempotent.
#[must_use]
pub fn clean_phone(raw: &str) -> Option<String> {
    let mut groups: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut leading_plus = false;

    for c in raw.chars() {
        if c.is_ascii_digit() {
            if leading_plus && groups.is_empty() && current.is_empty() {
                current.push('+');
            }
            current.push(c);
            continue;
        }
        flush_group(&mut groups, &mut current);
        // Only a `+` ahead of the first digit group survives, even when
        // spaces or brackets sit between it and the digits.
        if c == '+' && groups.is_empty() {
            leading_plus = true;
        }
    }
    flush_group(&mut groups, &mut current);

    if groups.is_empty() {
        None
    } else {
        Some(groups.join(" "))
    }
}

fn flush_group(groups: &mut Vec<String>, current: &mut String) {
    if current.chars().any(|c| c.is_ascii_digit()) {
        groups.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

fn parse_rating(token: &str) -> Option<f64> {
    token
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_count(token: &str) -> Option<u32> {
    token.replace(',', "").parse::<u32>().ok()
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
