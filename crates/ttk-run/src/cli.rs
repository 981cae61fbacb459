//! Command-line surface for embedding binaries.
//!
//! A suite binary builds a [`Tester`], registers its tests, and hands
//! control to [`Tester::main`], which parses the process arguments into
//! [`RunOptions`] and maps the run result to an exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::assert::Tester;
use crate::driver::RunOptions;

/// Arguments accepted by TTK suite binaries.
#[derive(Parser, Debug, Default)]
#[command(name = "ttk", about = "TTK tensor test runner")]
pub struct RunArgs {
    /// Name-selection patterns overriding the programmatic selection.
    pub patterns: Vec<String>,
    /// Print the selected test names and exit without running.
    #[arg(long)]
    pub list: bool,
    /// Write machine-readable per-test results to the given path.
    #[arg(long = "log-output", value_name = "PATH")]
    pub log_output: Option<PathBuf>,
    /// Disable ANSI colorization.
    #[arg(long = "no-colour")]
    pub no_colour: bool,
    /// Suppress the detailed error log in the final report.
    #[arg(long)]
    pub summary: bool,
    /// Print full tensor contents in diagnostics.
    #[arg(long = "full-tensors")]
    pub full_tensors: bool,
    /// Stop at the first test failure or error.
    #[arg(long = "early-abort")]
    pub early_abort: bool,
    /// Propagate uncaught test errors instead of isolating them.
    #[arg(long)]
    pub rethrow: bool,
}

impl RunArgs {
    /// Folds the flags into run options, layering over `defaults`.
    ///
    /// Positional patterns replace the default selection only when present.
    pub fn into_options(self, defaults: RunOptions) -> RunOptions {
        RunOptions {
            patterns: if self.patterns.is_empty() {
                defaults.patterns
            } else {
                self.patterns
            },
            early_abort: self.early_abort || defaults.early_abort,
            rethrow: self.rethrow || defaults.rethrow,
            summary_only: self.summary || defaults.summary_only,
            full_tensors: self.full_tensors || defaults.full_tensors,
            color: !self.no_colour && defaults.color,
            log_output: self.log_output.or(defaults.log_output),
        }
    }
}

impl Tester {
    /// Entry point for suite binaries: parses process arguments, runs, and
    /// maps the result to the process exit code (0 iff no failures and no
    /// errors).
    pub fn main(&mut self) -> ExitCode {
        self.main_with(RunArgs::parse(), RunOptions::default())
    }

    /// Same as [`Tester::main`] with injected arguments and defaults.
    pub fn main_with(&mut self, args: RunArgs, defaults: RunOptions) -> ExitCode {
        let list = args.list;
        let opts = args.into_options(defaults);
        if list {
            return match self.select(&opts.patterns) {
                Ok(names) => {
                    for name in names {
                        println!("{name}");
                    }
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("{err}");
                    ExitCode::FAILURE
                }
            };
        }
        match self.run_stdout(&opts) {
            Ok(summary) if summary.status == 0 => ExitCode::SUCCESS,
            Ok(_) => ExitCode::FAILURE,
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_into_options() {
        let args = RunArgs::try_parse_from([
            "ttk",
            "--no-colour",
            "--summary",
            "--early-abort",
            "--log-output",
            "/tmp/ttk.log",
            "blas.*",
        ])
        .expect("parse");
        assert!(args.summary);
        let opts = args.into_options(RunOptions::default());
        assert!(!opts.color);
        assert!(opts.summary_only);
        assert!(opts.early_abort);
        assert_eq!(opts.patterns, vec!["blas.*".to_string()]);
        assert_eq!(opts.log_output, Some(PathBuf::from("/tmp/ttk.log")));
    }

    #[test]
    fn positional_patterns_override_programmatic_selection() {
        let args = RunArgs::try_parse_from(["ttk", "conv"]).expect("parse");
        let defaults = RunOptions {
            patterns: vec!["blas".to_string()],
            ..RunOptions::default()
        };
        let opts = args.into_options(defaults);
        assert_eq!(opts.patterns, vec!["conv".to_string()]);
    }

    #[test]
    fn absent_patterns_keep_the_programmatic_selection() {
        let args = RunArgs::try_parse_from(["ttk", "--rethrow"]).expect("parse");
        let defaults = RunOptions {
            patterns: vec!["blas".to_string()],
            ..RunOptions::default()
        };
        let opts = args.into_options(defaults);
        assert_eq!(opts.patterns, vec!["blas".to_string()]);
        assert!(opts.rethrow);
    }
}
