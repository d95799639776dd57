//! Evidence sentence extraction.
//!
//! [`find_sentences`] turns a free-text issue body into the human-readable
//! sentences that mention a keyword. Fenced code is never quoted, stack-trace
//! debris is filtered out, and long sentences are shortened for display.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::markdown::strip_fenced_code;
use crate::util::{collapse_whitespace, truncate_chars};

/// Longest evidence sentence kept verbatim, in characters.
pub const MAX_SENTENCE_CHARS: usize = 250;

// Lines that look like machine-generated diagnostics rather than prose:
// Python tracebacks and frames, JVM/JS `at ...` frames, chained causes and
// bare `path/to/file.ext:line` references.
static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(
        r#"^(?:Traceback\b|File "[^"]*", line \d+|at \S+ ?\(.*:\d+(?::\d+)?\)|at [\w./\\-]+:\d+|Caused by:|[\w./\\-]+\.[A-Za-z]+:\d+(?::\d+)?\b)"#,
    ) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

/// How a single text unit relates to the keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Contains the keyword. Kept, even when it also looks like noise.
    Evidence,
    /// Stack-trace or frame artifact without the keyword.
    Noise,
    /// Ordinary text without the keyword.
    Plain,
}

/// Case-insensitive literal matcher for a search keyword.
///
/// The keyword is escaped before compilation, so `C++` or `a.b` match
/// literally.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Option<Regex>,
}

impl KeywordMatcher {
    pub fn new(keyword: &str) -> Self {
        let pattern = RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build();
        match pattern {
            Ok(re) => Self { pattern: Some(re) },
            Err(err) => {
                // Only reachable when the keyword blows the compiled size limit.
                tracing::warn!(%err, "keyword too large to match; treating as absent");
                Self { pattern: None }
            }
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Byte range of the first occurrence in `text`.
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        self.pattern.as_ref()?.find(text).map(|m| m.range())
    }

    pub fn classify(&self, unit: &str) -> Classification {
        if self.is_match(unit) {
            Classification::Evidence
        } else if is_noise(unit) {
            Classification::Noise
        } else {
            Classification::Plain
        }
    }
}

/// Whether a trimmed text unit looks like diagnostic output.
pub fn is_noise(unit: &str) -> bool {
    NOISE_RE.is_match(unit.trim_start())
}

/// Lazily yield the evidence sentences for `keyword` in `text`.
///
/// The returned iterator is finite and one-shot: it owns a code-stripped copy
/// of the text and walks it once, in order.
pub fn find_sentences(text: &str, keyword: &str) -> Sentences {
    Sentences {
        text: strip_fenced_code(text).into_owned(),
        pos: 0,
        matcher: KeywordMatcher::new(keyword),
    }
}

/// Iterator returned by [`find_sentences`].
#[derive(Debug)]
pub struct Sentences {
    text: String,
    pos: usize,
    matcher: KeywordMatcher,
}

impl Iterator for Sentences {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(range) = self.next_unit() {
            let unit = collapse_whitespace(&self.text[range]);
            if unit.is_empty() {
                continue;
            }
            match self.matcher.classify(&unit) {
                Classification::Evidence => {
                    return Some(truncate_chars(&unit, MAX_SENTENCE_CHARS).into_owned());
                }
                Classification::Noise => tracing::trace!(unit = %unit, "dropping noise line"),
                Classification::Plain => {}
            }
        }
        None
    }
}

impl Sentences {
    /// Advance past the next sentence-like unit and return its byte range.
    ///
    /// A unit ends at a newline, or after a run of `.`, `!`, `?` that is
    /// followed by whitespace or the end of the text. Terminal punctuation
    /// stays with its unit.
    fn next_unit(&mut self) -> Option<Range<usize>> {
        let start = self.pos;
        let rest = self.text.get(start..).filter(|r| !r.is_empty())?;

        let mut chars = rest.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c == '\n' {
                self.pos = start + i + 1;
                return Some(start..start + i);
            }
            if !is_terminal(c) {
                continue;
            }
            let mut end = i + c.len_utf8();
            while let Some(&(j, d)) = chars.peek() {
                if !is_terminal(d) {
                    break;
                }
                end = j + d.len_utf8();
                chars.next();
            }
            if chars.peek().is_none_or(|&(_, d)| d.is_whitespace()) {
                self.pos = start + end;
                return Some(start..start + end);
            }
        }

        self.pos = self.text.len();
        Some(start..self.text.len())
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}
