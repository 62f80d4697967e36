use crate::Result;
use crate::join::JoinOutcome;
use crate::misc::ColorMode;
use core::fmt::{self, Write};
use owo_colors::OwoColorize;
use std::borrow::Cow;
use std::io::{IsTerminal, stdout};
use terminal_size::{Width, terminal_size};

const DEFAULT_TERMINAL_WIDTH: usize = 120;
const SEPARATOR_WIDTH: usize = 40;

/// Color for anomaly lines: orange, matching "needs attention".
const WARN_COLOR: (u8, u8, u8) = (255, 165, 0);

/// Render the reconciliation outcome of a join as a human-readable report.
///
/// The two anomaly classes are kept clearly apart: primary rows whose key
/// found no match (in primary-table order), then secondary keys never
/// referenced (in sorted key order).
pub fn generate<W: Write>(outcome: &JoinOutcome, color: ColorMode, writer: &mut W) -> Result<()> {
    ConsoleReporter::new(writer, color).generate_report(outcome)
}

struct ConsoleReporter<'a, W: Write> {
    writer: &'a mut W,
    colors: ColorScheme,
    terminal_width: usize,
}

impl<'a, W: Write> ConsoleReporter<'a, W> {
    fn new(writer: &'a mut W, color_mode: ColorMode) -> Self {
        Self {
            writer,
            colors: ColorScheme::new(color_mode),
            terminal_width: detect_terminal_width(),
        }
    }

    fn generate_report(&mut self, outcome: &JoinOutcome) -> Result<()> {
        self.write_header()?;
        self.write_summary(outcome)?;
        self.write_unmatched_primary(outcome)?;
        self.write_unmatched_index(outcome)?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        self.colors.write_styled_text(self.writer, "Join Reconciliation Report", TextStyle::Bold)?;
        writeln!(self.writer)?;
        self.colors.write_styled_line(self.writer, "═", SEPARATOR_WIDTH, TextStyle::Dimmed)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, outcome: &JoinOutcome) -> Result<()> {
        writeln!(self.writer, "Summary:")?;
        writeln!(self.writer, "  Rows joined            : {}", outcome.joined.len())?;
        write!(self.writer, "  Unmatched primary rows : ")?;
        self.colors.write_count(self.writer, outcome.unmatched_primary.len())?;
        writeln!(self.writer)?;
        write!(self.writer, "  Orphaned secondary keys: ")?;
        self.colors.write_count(self.writer, outcome.unmatched_index.len())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_unmatched_primary(&mut self, outcome: &JoinOutcome) -> Result<()> {
        if outcome.unmatched_primary.is_empty() {
            return Ok(());
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "Primary rows with no match in the secondary table:")?;
        for unmatched in &outcome.unmatched_primary {
            let line = format!("  {} {:?}", unmatched.key, unmatched.row);
            self.colors
                .write_styled_text(self.writer, &truncate(&line, self.terminal_width), TextStyle::Warn)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_unmatched_index(&mut self, outcome: &JoinOutcome) -> Result<()> {
        if outcome.unmatched_index.is_empty() {
            return Ok(());
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "Secondary keys never referenced by the primary table:")?;
        for key in &outcome.unmatched_index {
            let line = format!("  {key}");
            self.colors.write_styled_text(self.writer, &line, TextStyle::Warn)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone)]
enum TextStyle {
    Bold,
    Dimmed,
    Warn,
}

struct ColorScheme {
    enabled: bool,
}

impl ColorScheme {
    fn new(color_mode: ColorMode) -> Self {
        let enabled = matches!(color_mode, ColorMode::Always) || (matches!(color_mode, ColorMode::Auto) && stdout().is_terminal());
        Self { enabled }
    }

    fn write_styled_text<W: Write>(&self, writer: &mut W, text: &str, style: TextStyle) -> fmt::Result {
        if !self.enabled {
            return write!(writer, "{text}");
        }
        match style {
            TextStyle::Bold => write!(writer, "{}", text.bold()),
            TextStyle::Dimmed => write!(writer, "{}", text.dimmed()),
            TextStyle::Warn => write!(writer, "{}", text.truecolor(WARN_COLOR.0, WARN_COLOR.1, WARN_COLOR.2)),
        }
    }

    fn write_styled_line<W: Write>(&self, writer: &mut W, ch: &str, width: usize, style: TextStyle) -> fmt::Result {
        self.write_styled_text(writer, &ch.repeat(width), style)
    }

    fn write_count<W: Write>(&self, writer: &mut W, count: usize) -> fmt::Result {
        if self.enabled && count > 0 {
            write!(writer, "{}", count.truecolor(WARN_COLOR.0, WARN_COLOR.1, WARN_COLOR.2))
        } else {
            write!(writer, "{count}")
        }
    }
}

fn detect_terminal_width() -> usize {
    terminal_size().map_or(DEFAULT_TERMINAL_WIDTH, |(Width(width), _)| usize::from(width))
}

/// Shorten a line to `max_width` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max_width: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_width {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .take(max_width.saturating_sub(1))
                .chain(core::iter::once('…'))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::UnmatchedRow;

    fn outcome_with_anomalies() -> JoinOutcome {
        let mut outcome = JoinOutcome::default();
        outcome.joined.push(vec!["A".to_owned(), "1".to_owned(), "100".to_owned(), "c".to_owned()]);
        outcome.unmatched_primary.push(UnmatchedRow {
            key: "51560".to_owned(),
            row: vec!["51560".to_owned(), "X".to_owned(), "51560".to_owned()],
        });
        outcome.unmatched_index.push("08014".to_owned());
        outcome
    }

    #[test]
    fn test_report_contains_both_anomaly_classes() {
        let mut output = String::new();
        generate(&outcome_with_anomalies(), ColorMode::Never, &mut output).unwrap();

        assert!(output.contains("Rows joined            : 1"));
        assert!(output.contains("Unmatched primary rows : 1"));
        assert!(output.contains("Orphaned secondary keys: 1"));
        assert!(output.contains("Primary rows with no match"));
        assert!(output.contains("51560"));
        assert!(output.contains("Secondary keys never referenced"));
        assert!(output.contains("08014"));
    }

    #[test]
    fn test_clean_outcome_has_no_anomaly_sections() {
        let mut output = String::new();
        generate(&JoinOutcome::default(), ColorMode::Never, &mut output).unwrap();

        assert!(output.contains("Rows joined            : 0"));
        assert!(!output.contains("Primary rows with no match"));
        assert!(!output.contains("Secondary keys never referenced"));
    }

    #[test]
    fn test_never_mode_emits_no_escape_codes() {
        let mut output = String::new();
        generate(&outcome_with_anomalies(), ColorMode::Never, &mut output).unwrap();
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_always_mode_colorizes_anomalies() {
        let mut output = String::new();
        generate(&outcome_with_anomalies(), ColorMode::Always, &mut output).unwrap();
        assert!(output.contains('\u{1b}'));
    }

    #[test]
    fn test_long_anomaly_rows_fit_terminal_width() {
        let mut outcome = JoinOutcome::default();
        outcome.unmatched_primary.push(UnmatchedRow {
            key: "51560".to_owned(),
            row: (0..100).map(|n| format!("field-{n}")).collect(),
        });

        let mut output = String::new();
        generate(&outcome, ColorMode::Never, &mut output).unwrap();

        // Not a terminal when testing, so lines wrap to the default width.
        let longest = output.lines().map(|line| line.chars().count()).max().unwrap();
        assert!(longest <= DEFAULT_TERMINAL_WIDTH);
        assert!(output.contains('…'));
    }

    #[test]
    fn test_truncate_short_text_borrows() {
        let result = truncate("short", 10);
        assert_eq!(result, "short");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_long_text_ends_with_ellipsis() {
        let result = truncate("abcdefghij", 5);
        assert_eq!(result, "abcd…");
        assert_eq!(result.chars().count(), 5);
        assert!(matches!(result, Cow::Owned(_)));
    }
}
