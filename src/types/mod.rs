// Record model: raw JSON records in, typed issues out. Shared by the loader,
// the keyword search and the label analysis.

pub mod coerce;
pub mod event;
pub mod issue;

pub use event::*;
pub use issue::*;

use serde_json::Value;

/// Normalize a raw event fragment. See [`Event::from_raw`].
pub fn normalize_event(raw: &Value) -> Event {
    Event::from_raw(raw)
}

/// Normalize a raw issue record. See [`Issue::from_raw`].
pub fn normalize_issue(raw: &Value) -> Issue {
    Issue::from_raw(raw)
}
