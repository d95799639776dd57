use std::io::Write;

use anyhow::Result;
use crossterm::style::Stylize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// One horizontal bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Anything that can display a horizontal bar chart.
///
/// The terminal renderer is the production implementation; tests record the
/// bars instead.
pub trait BarChart {
    fn render(&mut self, title: &str, bars: &[Bar]) -> Result<()>;
}

const EIGHTHS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

/// Draws bars with Unicode block glyphs.
pub struct TerminalChart<W: Write> {
    out: W,
    /// Width of the longest bar, in cells.
    width: usize,
    /// Labels wider than this are cut with `…`.
    max_label_width: usize,
    color: bool,
}

impl TerminalChart<std::io::Stdout> {
    pub fn stdout(width: usize) -> Self {
        Self::new(std::io::stdout(), width)
    }
}

impl<W: Write> TerminalChart<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width: width.max(1),
            max_label_width: 40,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BarChart for TerminalChart<W> {
    fn render(&mut self, title: &str, bars: &[Bar]) -> Result<()> {
        writeln!(self.out)?;
        if self.color {
            writeln!(self.out, "{}", title.bold())?;
        } else {
            writeln!(self.out, "{title}")?;
        }
        writeln!(self.out, "{}", "─".repeat(title.width().max(1)))?;

        let labels: Vec<String> = bars
            .iter()
            .map(|b| fit_label(&b.label, self.max_label_width))
            .collect();
        let label_col = labels.iter().map(|l| l.width()).max().unwrap_or(0);
        let max_value = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);

        for (bar, label) in bars.iter().zip(&labels) {
            let pad = " ".repeat(label_col - label.width());
            let glyphs = bar_glyphs(bar.value, max_value, self.width);
            let glyphs = if self.color {
                glyphs.cyan().to_string()
            } else {
                glyphs
            };
            writeln!(
                self.out,
                "{label}{pad} │{glyphs} {}",
                format_value(bar.value)
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Block glyphs for `value` scaled so that `max` spans `width` cells.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar_glyphs(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let eighths = ((value / max) * (width * 8) as f64).round() as usize;
    let mut out = "█".repeat(eighths / 8);
    if eighths % 8 != 0 {
        out.push(EIGHTHS[eighths % 8]);
    }
    if out.is_empty() {
        // Tiny but non-zero values still get a sliver.
        out.push(EIGHTHS[1]);
    }
    out
}

/// Cut a label to `max` display columns, marking the cut with `…`.
fn fit_label(label: &str, max: usize) -> String {
    if label.width() <= max {
        return label.to_owned();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_bar_spans_full_width() {
        assert_eq!(bar_glyphs(4.0, 4.0, 5), "█████");
        assert_eq!(bar_glyphs(2.0, 4.0, 5), "██▌");
        assert_eq!(bar_glyphs(0.0, 4.0, 5), "");
    }

    #[test]
    fn tiny_values_get_a_sliver() {
        assert_eq!(bar_glyphs(0.001, 100.0, 5), "▏");
    }

    #[test]
    fn long_labels_are_cut_by_display_width() {
        assert_eq!(fit_label("short", 10), "short");
        assert_eq!(fit_label("abcdefghij", 5), "abcd…");
        assert_eq!(fit_label("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn renders_plain_rows() {
        let mut chart = TerminalChart::new(Vec::new(), 4).with_color(false);
        chart
            .render("Counts", &[Bar::new("a", 2.0), Bar::new("bbb", 1.0)])
            .unwrap();
        let out = String::from_utf8(chart.into_inner()).unwrap();
        assert!(out.contains("Counts"));
        assert!(out.contains("a   │████ 2"));
        assert!(out.contains("bbb │██ 1"));
    }

    #[test]
    fn fractional_values_show_one_decimal() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(2.5), "2.5");
    }
}
