//! Label frequency and resolution-time aggregation.

use std::io::{self, Write};

use anyhow::Result;
use indexmap::IndexMap;

use crate::chart::{Bar, BarChart};
use crate::types::Issue;
use crate::util::days;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelAnalysis {
    /// Issues carrying each label, most frequent first. Ties keep the order
    /// in which labels were first seen.
    pub frequencies: IndexMap<String, usize>,
    /// Mean days from creation to last update, per label, over closed issues
    /// that have both dates.
    pub average_resolution_days: IndexMap<String, f64>,
}

impl LabelAnalysis {
    #[allow(clippy::cast_precision_loss)]
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut frequencies: IndexMap<String, usize> = IndexMap::new();
        let mut resolution: IndexMap<String, (f64, usize)> = IndexMap::new();

        for issue in issues {
            let resolved = issue.resolution_time().map(days);
            for name in issue.label_names() {
                *frequencies.entry(name.to_owned()).or_default() += 1;
                if let Some(d) = resolved {
                    let slot = resolution.entry(name.to_owned()).or_default();
                    slot.0 += d;
                    slot.1 += 1;
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts.
        frequencies.sort_by(|_, a, _, b| b.cmp(a));

        let average_resolution_days = resolution
            .into_iter()
            .map(|(name, (total, n))| (name, total / n as f64))
            .collect();

        Self {
            frequencies,
            average_resolution_days,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn frequency_bars(&self) -> Vec<Bar> {
        self.frequencies
            .iter()
            .map(|(name, count)| Bar::new(name.clone(), *count as f64))
            .collect()
    }

    pub fn resolution_bars(&self) -> Vec<Bar> {
        self.average_resolution_days
            .iter()
            .map(|(name, avg)| Bar::new(name.clone(), *avg))
            .collect()
    }

    pub fn print_summary(&self, out: &mut impl Write) -> io::Result<()> {
        if self.is_empty() {
            writeln!(out, "No labels found in the loaded issues.")?;
            return Ok(());
        }
        writeln!(out, "\nLabel frequency ({} distinct):", self.frequencies.len())?;
        for (name, count) in &self.frequencies {
            writeln!(out, "  {name}: {count}")?;
        }
        if self.average_resolution_days.is_empty() {
            writeln!(out, "\nNo closed issues with both dates to time.")?;
        } else {
            writeln!(out, "\nAverage resolution time (closed issues):")?;
            for (name, avg) in &self.average_resolution_days {
                writeln!(out, "  {name}: {avg:.1} days")?;
            }
        }
        Ok(())
    }

    /// Print the summary and render both charts. Nothing is charted when no
    /// issue has labels.
    pub fn run(
        issues: &[Issue],
        chart: &mut impl BarChart,
        out: &mut impl Write,
    ) -> Result<Self> {
        let analysis = Self::from_issues(issues);
        analysis.print_summary(out)?;
        if analysis.is_empty() {
            return Ok(analysis);
        }
        chart.render("Issues per label", &analysis.frequency_bars())?;
        if !analysis.average_resolution_days.is_empty() {
            chart.render(
                "Average resolution time per label (days)",
                &analysis.resolution_bars(),
            )?;
        }
        Ok(analysis)
    }
}
