use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use regex::Regex;

// A triple-backtick span opened and closed on the same line.
static INLINE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"```[^\n]*?```") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

/// Remove fenced code (```` ``` ```` or `~~~` blocks, and ```` ```...``` ````
/// spans on a single line) from markdown text.
///
/// A removed block is replaced by a single newline so the prose on either
/// side stays in separate lines; a removed inline span becomes a space. An
/// unclosed block fence runs to the end of the text, following CommonMark.
/// Returns `Cow::Borrowed` when there is nothing to strip.
pub fn strip_fenced_code(markdown: &str) -> Cow<'_, str> {
    let mut fences = fenced_code_ranges(markdown);
    if fences.is_empty() {
        return Cow::Borrowed(markdown);
    }
    fences.sort_by_key(|(range, _)| range.start);

    let mut out = String::with_capacity(markdown.len());
    let mut cursor = 0;
    for (range, replacement) in fences {
        if range.end <= cursor {
            continue;
        }
        if range.start >= cursor {
            out.push_str(&markdown[cursor..range.start]);
            out.push(replacement);
        }
        cursor = range.end;
    }
    out.push_str(&markdown[cursor..]);
    Cow::Owned(out)
}

/// Byte ranges of every fenced code block and inline triple-backtick span,
/// each paired with the character that replaces it.
fn fenced_code_ranges(markdown: &str) -> Vec<(Range<usize>, char)> {
    let blocks = Parser::new_ext(markdown, Options::empty())
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => Some((range, '\n')),
            _ => None,
        });
    let spans = INLINE_FENCE_RE.find_iter(markdown).map(|m| (m.range(), ' '));
    blocks.chain(spans).collect()
}
