//! Console rendering for test runs.
//!
//! Color handling is an explicit strategy handed to the [`Reporter`] at
//! construction; nothing in this module mutates process-global formatting
//! state.

use std::io::{self, Write};

use colored::Color;
use serde::{Deserialize, Serialize};

use crate::assert::ErrorEntry;

/// Width of the test-name column in progress lines.
const NAME_COLUMNS: usize = 48;

/// Outcome category of one executed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestOutcome {
    /// No uncaught error and zero failed assertions.
    Pass,
    /// At least one failed assertion, body ran to completion.
    Fail,
    /// An uncaught error escaped the test body.
    Error,
}

impl TestOutcome {
    /// Marker word rendered in the progress column.
    pub fn label(&self) -> &'static str {
        match self {
            TestOutcome::Pass => "PASS",
            TestOutcome::Fail => "FAIL",
            TestOutcome::Error => "ERROR",
        }
    }
}

/// Output colorization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// ANSI colors per outcome category.
    Ansi,
    /// Plain text, for logs and non-terminal sinks.
    Plain,
}

impl Style {
    // Escape sequences are written unconditionally under `Ansi`; the
    // caller's strategy choice is authoritative, not tty or env probing.
    fn paint(&self, outcome: TestOutcome) -> String {
        match self {
            Style::Plain => outcome.label().to_string(),
            Style::Ansi => {
                let color = match outcome {
                    TestOutcome::Pass => Color::Green,
                    TestOutcome::Fail => Color::Red,
                    TestOutcome::Error => Color::Magenta,
                };
                format!("\x1b[{}m{}\x1b[0m", color.to_fg_str(), outcome.label())
            }
        }
    }
}

/// Renders progress lines, the run summary, and the detailed error log.
pub struct Reporter<'a, W: Write> {
    out: &'a mut W,
    style: Style,
}

impl<'a, W: Write> Reporter<'a, W> {
    /// Creates a reporter writing to the given sink with the given strategy.
    pub fn new(out: &'a mut W, style: Style) -> Self {
        Self { out, style }
    }

    // Width accounting is per character, never per byte, so multi-byte
    // test names cannot split at the truncation point.
    fn padded_name(name: &str) -> String {
        let chars = name.chars().count();
        if chars > NAME_COLUMNS {
            let head: String = name.chars().take(NAME_COLUMNS - 2).collect();
            format!("{head}..")
        } else {
            format!("{}{}", name, " ".repeat(NAME_COLUMNS - chars))
        }
    }

    /// Announces the run.
    pub fn header(&mut self, selected: usize) -> io::Result<()> {
        writeln!(self.out, "Running {selected} tests")
    }

    /// Emits the pending progress marker for a test about to run.
    pub fn begin_test(&mut self, name: &str) -> io::Result<()> {
        write!(self.out, "{} ", Self::padded_name(name))?;
        self.out.flush()
    }

    /// Replaces the pending marker with the test's outcome.
    pub fn end_test(&mut self, outcome: TestOutcome) -> io::Result<()> {
        writeln!(self.out, "{}", self.style.paint(outcome))
    }

    /// Notes an early termination of the run loop.
    pub fn aborted(&mut self, skipped: usize) -> io::Result<()> {
        writeln!(self.out, "aborted early: {skipped} test(s) not run")
    }

    /// One-line aggregate summary.
    pub fn summary(
        &mut self,
        asserts: usize,
        tests: usize,
        failures: usize,
        errors: usize,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "Completed {asserts} asserts in {tests} tests with {failures} failures and {errors} errors"
        )
    }

    /// Full ordered error log, entries separated by rule lines.
    pub fn error_log(&mut self, entries: &[ErrorEntry]) -> io::Result<()> {
        for entry in entries {
            writeln!(self.out, "{}", "-".repeat(70))?;
            writeln!(self.out, "{}", entry.test)?;
            writeln!(self.out, "  {}", entry.message)?;
            writeln!(self.out, "  at {}", entry.context)?;
        }
        if !entries.is_empty() {
            writeln!(self.out, "{}", "-".repeat(70))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Reporter<'_, Vec<u8>>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        let mut reporter = Reporter::new(&mut buf, Style::Plain);
        f(&mut reporter).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn progress_line_pads_and_truncates() {
        let short = render(|r| r.begin_test("quick"));
        assert_eq!(short.len(), NAME_COLUMNS + 1);
        let long_name = "x".repeat(80);
        let long = render(|r| r.begin_test(&long_name));
        assert!(long.trim_end().ends_with(".."));
        assert_eq!(long.trim_end().len(), NAME_COLUMNS);
    }

    #[test]
    fn multibyte_names_keep_char_boundaries() {
        let padded = render(|r| r.begin_test(&"あ".repeat(30)));
        assert_eq!(padded.chars().count(), NAME_COLUMNS + 1);
        let truncated = render(|r| r.begin_test(&"あ".repeat(60)));
        let trimmed = truncated.trim_end();
        assert!(trimmed.ends_with(".."));
        assert_eq!(trimmed.chars().count(), NAME_COLUMNS);
    }

    #[test]
    fn ansi_style_emits_escapes_unconditionally() {
        let mut buf = Vec::new();
        let mut reporter = Reporter::new(&mut buf, Style::Ansi);
        reporter.end_test(TestOutcome::Pass).expect("write");
        reporter.end_test(TestOutcome::Fail).expect("write");
        reporter.end_test(TestOutcome::Error).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text,
            "\x1b[32mPASS\x1b[0m\n\x1b[31mFAIL\x1b[0m\n\x1b[35mERROR\x1b[0m\n"
        );
    }

    #[test]
    fn summary_line_format_is_stable() {
        let text = render(|r| r.summary(12, 3, 1, 0));
        assert_eq!(
            text,
            "Completed 12 asserts in 3 tests with 1 failures and 0 errors\n"
        );
    }

    #[test]
    fn error_log_separates_entries_with_rules() {
        let entries = vec![
            ErrorEntry {
                test: "a".into(),
                message: "m1".into(),
                context: "f.rs:1:1".into(),
            },
            ErrorEntry {
                test: "b".into(),
                message: "m2".into(),
                context: "f.rs:2:2".into(),
            },
        ];
        let text = render(|r| r.error_log(&entries));
        let rules = text
            .lines()
            .filter(|line| !line.is_empty() && line.chars().all(|c| c == '-'))
            .count();
        assert_eq!(rules, 3);
        assert!(text.contains("at f.rs:2:2"));
    }

    #[test]
    fn plain_style_emits_no_escapes() {
        let text = render(|r| r.end_test(TestOutcome::Error));
        assert_eq!(text, "ERROR\n");
    }
}
