use std::borrow::Cow;

use chrono::TimeDelta;

/// Marker appended to text cut by [`truncate_chars`].
pub const ELLIPSIS: &str = "...";

/// Collapse every run of whitespace to a single space and trim both ends.
///
/// Returns `Cow::Borrowed` when the text is already collapsed.
pub fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    let trimmed = text.trim();
    let needs_rewrite = trimmed
        .chars()
        .zip(trimmed.chars().skip(1))
        .any(|(a, b)| a.is_whitespace() && (a != ' ' || b.is_whitespace()));
    if !needs_rewrite {
        return Cow::Borrowed(trimmed);
    }
    Cow::Owned(trimmed.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Cut `text` to at most `max_chars` characters, appending [`ELLIPSIS`] when
/// anything was removed.
pub fn truncate_chars(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((byte_idx, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..byte_idx])),
    }
}

/// Fractional number of days in a duration.
#[allow(clippy::cast_precision_loss)]
pub fn days(duration: TimeDelta) -> f64 {
    duration.num_seconds() as f64 / 86_400.0
}
