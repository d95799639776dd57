use chrono::{DateTime, Utc};
use serde_json::Value;

use super::coerce::{self, field};

/// One timestamped action (comment, label change, state change) on an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub event_type: Option<String>,
    pub author: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    /// Set when `event_type` is a labeling action.
    pub label: Option<String>,
    pub comment: Option<String>,
}

impl Event {
    /// Build an event from a raw record fragment. Never fails.
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            event_type: coerce::string(field(raw, "event_type")),
            author: coerce::string(field(raw, "author")),
            event_date: coerce::date(field(raw, "event_date")),
            label: coerce::string(field(raw, "label")),
            comment: coerce::string(field(raw, "comment")),
        }
    }
}
