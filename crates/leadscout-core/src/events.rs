use serde::{Deserialize, Serialize};

use crate::Lead;

/// A single entry in the event stream of a scrape run.
///
/// Serialized with an explicit `type` tag so transports can forward events
/// without inventing their own framing:
///
/// ```text
/// {"type":"LEAD","payload":{"name":"Smile Dental", ...}}
/// {"type":"PROGRESS","payload":{"page":2}}
/// {"type":"DONE"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEvent {
    /// Human-readable status line.
    Status(String),
    Lead(Lead),
    Progress {
        page: usize,
    },
    /// Result of the website pass for one lead. Sent for every accepted lead
    /// of a deep-search run, including when nothing was found.
    Enrich {
        name: String,
        email: Option<String>,
        social_links: Vec<String>,
    },
    /// Terminal sentinel; nothing follows it for the same run.
    Done,
}

impl LogEvent {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status(message.into())
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}
