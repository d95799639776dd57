use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;

use super::coerce::{self, UNKNOWN_NUMBER, field};
use super::event::Event;

// ---------------------------------------------------------------------------
// Issue-specific enums
// ---------------------------------------------------------------------------

/// Issue state, compared by the raw lowercase value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    Open,
    Closed,
    #[default]
    Unknown,
}

impl State {
    /// Coerce a raw value. Only the literal strings `"open"` and `"closed"`
    /// are recognised; anything else is `Unknown`.
    pub fn from_raw(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("open") => State::Open,
            Some("closed") => State::Closed,
            _ => State::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            State::Open => "open",
            State::Closed => "closed",
            State::Unknown => "unknown",
        }
    }
}

/// A label as found in the source data: either a bare name or an object
/// carrying a `name` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Plain(String),
    Named {
        name: String,
        /// Hex color without `#` prefix, when the source provides one.
        color: Option<String>,
    },
}

impl Label {
    /// Returns `None` for elements with no derivable name (`null`, arrays,
    /// objects without a string `name`).
    pub fn from_raw(raw: &Value) -> Option<Self> {
        match raw {
            Value::Object(_) => {
                let name = field(raw, "name")?.as_str()?.to_owned();
                let color = coerce::string(field(raw, "color"));
                Some(Label::Named { name, color })
            }
            other => coerce::string(Some(other)).map(Label::Plain),
        }
    }

    /// Display name regardless of the source shape.
    pub fn name(&self) -> &str {
        match self {
            Label::Plain(name) | Label::Named { name, .. } => name,
        }
    }
}

// ---------------------------------------------------------------------------
// Issue domain type
// ---------------------------------------------------------------------------

/// A normalized issue. Every field holds a sentinel when the source was
/// missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub url: Option<String>,
    pub creator: Option<String>,
    pub labels: Vec<Label>,
    pub state: State,
    pub assignees: Vec<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    /// `-1` when the source number could not be parsed.
    pub number: i64,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
    pub timeline_url: Option<String>,
    pub events: Vec<Event>,
}

impl Default for Issue {
    fn default() -> Self {
        Self {
            url: None,
            creator: None,
            labels: Vec::new(),
            state: State::Unknown,
            assignees: Vec::new(),
            title: None,
            text: None,
            number: UNKNOWN_NUMBER,
            created_date: None,
            updated_date: None,
            timeline_url: None,
            events: Vec::new(),
        }
    }
}

impl Issue {
    /// Build an issue from a raw record. Total over any JSON value, including
    /// `null`.
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            url: coerce::string(field(raw, "url")),
            creator: coerce::string(field(raw, "creator")),
            labels: coerce::elements(field(raw, "labels"))
                .iter()
                .filter_map(Label::from_raw)
                .collect(),
            state: State::from_raw(field(raw, "state")),
            assignees: coerce::elements(field(raw, "assignees"))
                .iter()
                .filter_map(assignee_login)
                .collect(),
            title: coerce::string(field(raw, "title")),
            text: coerce::string(field(raw, "text")),
            number: coerce::number(field(raw, "number")),
            created_date: coerce::date(field(raw, "created_date")),
            updated_date: coerce::date(field(raw, "updated_date")),
            timeline_url: coerce::string(field(raw, "timeline_url")),
            events: coerce::elements(field(raw, "events"))
                .iter()
                .map(Event::from_raw)
                .collect(),
        }
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(Label::name)
    }

    /// Time from creation to last update, for closed issues with both dates.
    pub fn resolution_time(&self) -> Option<TimeDelta> {
        if self.state != State::Closed {
            return None;
        }
        let (created, updated) = (self.created_date?, self.updated_date?);
        Some(updated - created)
    }
}

/// Assignees arrive as bare logins or as user objects with a `login` field.
fn assignee_login(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => coerce::string(field(raw, "login")),
        _ => None,
    }
}
