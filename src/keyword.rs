//! Keyword search over a set of issues.
//!
//! [`search`] is pure: it selects the issues that mention the keyword and
//! gathers evidence sentences for each. [`KeywordSearch`] adds the side
//! effects of a run: the report file, the console summary and the chart.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::chart::{Bar, BarChart};
use crate::extract::{KeywordMatcher, find_sentences};
use crate::types::Issue;
use crate::util::{ELLIPSIS, collapse_whitespace};

/// Characters kept on each side of the keyword in a fallback snippet.
pub const SNIPPET_RADIUS: usize = 60;

/// Evidence gathered for one matching issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueMatch {
    pub number: i64,
    pub title: String,
    pub evidence: Vec<String>,
    /// True when no sentence qualified and the evidence is a raw snippet.
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub keyword: String,
    pub matches: Vec<IssueMatch>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// One bar per matching issue, sized by the evidence written for it.
    #[allow(clippy::cast_precision_loss)]
    pub fn chart_bars(&self) -> Vec<Bar> {
        self.matches
            .iter()
            .map(|m| Bar::new(m.title.clone(), m.evidence.len() as f64))
            .collect()
    }

    /// Each issue title on its own line, followed by its evidence lines.
    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        for m in &self.matches {
            writeln!(w, "{}", m.title)?;
            for line in &m.evidence {
                writeln!(w, "  - {line}")?;
            }
        }
        Ok(())
    }

    /// Write the report to `path`, replacing any previous file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        self.write_to(&mut file)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn print_summary(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "\nSearching for keyword: '{}' (case-insensitive)", self.keyword)?;
        if self.is_empty() {
            writeln!(out, "No issues found that match the given keyword.")?;
            return Ok(());
        }
        writeln!(out, "Found {} matching issue(s):\n", self.matches.len())?;
        for m in &self.matches {
            writeln!(out, "- {}", m.title)?;
        }
        Ok(())
    }
}

/// Select issues mentioning `keyword` in their title or text and collect the
/// evidence for each.
///
/// Selection is a case-insensitive substring test on the trimmed keyword.
/// Evidence comes from [`find_sentences`] over the title followed by the text,
/// so a title mentioning the keyword counts as one sentence. When that finds
/// nothing, a snippet around the first occurrence is used instead.
pub fn search(issues: &[Issue], keyword: &str) -> Report {
    let keyword = keyword.trim();
    let needle = keyword.to_lowercase();
    if needle.is_empty() {
        return Report {
            keyword: keyword.to_owned(),
            matches: Vec::new(),
        };
    }

    let matcher = KeywordMatcher::new(keyword);
    let matches: Vec<IssueMatch> = issues
        .iter()
        .filter(|issue| mentions(issue, &needle))
        .map(|issue| collect_evidence(issue, keyword, &matcher))
        .collect();

    tracing::info!(keyword, matches = matches.len(), "keyword search finished");
    Report {
        keyword: keyword.to_owned(),
        matches,
    }
}

fn mentions(issue: &Issue, needle: &str) -> bool {
    issue.title_or_empty().to_lowercase().contains(needle)
        || issue.text_or_empty().to_lowercase().contains(needle)
}

fn collect_evidence(issue: &Issue, keyword: &str, matcher: &KeywordMatcher) -> IssueMatch {
    let title = display_title(issue);
    let text = issue.text_or_empty();
    let mut evidence: Vec<String> = find_sentences(&searchable(issue), keyword).collect();
    let fallback = evidence.is_empty();
    if fallback {
        let snippet = snippet_around(text, matcher)
            .or_else(|| snippet_around(issue.title_or_empty(), matcher))
            .unwrap_or_else(|| title.clone());
        evidence.push(snippet);
    }
    tracing::debug!(
        number = issue.number,
        state = issue.state.as_str(),
        evidence = evidence.len(),
        fallback,
        "issue matched"
    );
    IssueMatch {
        number: issue.number,
        title,
        evidence,
        fallback,
    }
}

/// Title and text as one document, the title ending its own sentence.
fn searchable(issue: &Issue) -> String {
    match (issue.title_or_empty(), issue.text_or_empty()) {
        ("", text) => text.to_owned(),
        (title, "") => title.to_owned(),
        (title, text) => format!("{title}\n{text}"),
    }
}

fn display_title(issue: &Issue) -> String {
    match issue.title.as_deref().map(collapse_whitespace) {
        Some(title) if !title.is_empty() => title.into_owned(),
        _ => format!("#{}", issue.number),
    }
}

/// A window of [`SNIPPET_RADIUS`] characters either side of the first
/// occurrence of the keyword. Clipped ends are marked with an ellipsis.
fn snippet_around(text: &str, matcher: &KeywordMatcher) -> Option<String> {
    let hit = matcher.find(text)?;
    let start = text[..hit.start]
        .char_indices()
        .rev()
        .nth(SNIPPET_RADIUS - 1)
        .map_or(0, |(i, _)| i);
    let end = text[hit.end..]
        .char_indices()
        .nth(SNIPPET_RADIUS)
        .map_or(text.len(), |(i, _)| hit.end + i);

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(&collapse_whitespace(&text[start..end]));
    if end < text.len() {
        snippet.push_str(ELLIPSIS);
    }
    Some(snippet)
}

/// A keyword search run that publishes its results.
pub struct KeywordSearch<C: BarChart> {
    output_path: PathBuf,
    chart: C,
}

impl<C: BarChart> KeywordSearch<C> {
    pub fn new(output_path: impl Into<PathBuf>, chart: C) -> Self {
        Self {
            output_path: output_path.into(),
            chart,
        }
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    /// Search, print the summary to `out`, and when anything matched write the
    /// report file and render the chart. Zero matches touch neither.
    pub fn run(
        &mut self,
        issues: &[Issue],
        keyword: &str,
        out: &mut impl Write,
    ) -> Result<Report> {
        let report = search(issues, keyword);
        report.print_summary(out)?;

        if report.is_empty() {
            tracing::info!("no matches; skipping report file and chart");
            return Ok(report);
        }

        report.save(&self.output_path)?;
        let shown = std::path::absolute(&self.output_path)
            .unwrap_or_else(|_| self.output_path.clone());
        writeln!(out, "\nResults saved to '{}'\n", shown.display())?;

        self.chart.render(
            &format!("Evidence per issue for '{}'", report.keyword),
            &report.chart_bars(),
        )?;
        Ok(report)
    }
}
