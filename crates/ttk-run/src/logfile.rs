//! Machine-readable per-test log sink.
//!
//! Format: one line per test, `<name> <pass> <fail> <error>`, followed by a
//! `[total]` line with the column sums.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use ttk_core::{ErrorInfo, TtkError};

use crate::driver::RunSummary;

/// Renders the log sink contents for a summary.
pub fn render_log(summary: &RunSummary) -> String {
    let mut out = String::new();
    for (name, counters) in &summary.per_test {
        let _ = writeln!(
            out,
            "{name} {} {} {}",
            counters.pass, counters.fail, counters.error
        );
    }
    let totals = summary.totals();
    let _ = writeln!(out, "[total] {} {} {}", totals.pass, totals.fail, totals.error);
    out
}

/// Writes the log sink to the given path.
pub fn write_log(path: &Path, summary: &RunSummary) -> Result<(), TtkError> {
    fs::write(path, render_log(summary)).map_err(|err| {
        TtkError::Io(
            ErrorInfo::new("log-write", "failed to write per-test log")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}
