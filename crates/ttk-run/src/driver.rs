//! Execution driver: runs selected tests in isolation and aggregates
//! per-test counters into a run summary.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use ttk_core::{ErrorInfo, TtkError};

use crate::assert::{ErrorEntry, TestFn, Tester};
use crate::logfile;
use crate::report::{Reporter, Style, TestOutcome};

/// Options controlling one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    /// Name-selection patterns; empty selects every registered test.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Stop iterating after the first failed or erred test.
    #[serde(default)]
    pub early_abort: bool,
    /// Propagate uncaught test errors out of the run instead of isolating
    /// them. Used for nested invocation where the caller wants hard failure.
    #[serde(default)]
    pub rethrow: bool,
    /// Suppress the detailed error log, printing only the summary line.
    #[serde(default)]
    pub summary_only: bool,
    /// Print full tensor contents in diagnostics instead of previews.
    #[serde(default)]
    pub full_tensors: bool,
    /// Colorize outcome markers.
    #[serde(default = "RunOptions::default_color")]
    pub color: bool,
    /// Optional machine-readable per-test log sink.
    #[serde(default)]
    pub log_output: Option<PathBuf>,
}

impl RunOptions {
    const fn default_color() -> bool {
        true
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            early_abort: false,
            rethrow: false,
            summary_only: false,
            full_tensors: false,
            color: Self::default_color(),
            log_output: None,
        }
    }
}

/// Per-test counter snapshot in a [`RunSummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCounters {
    /// Passing assertions recorded during the test.
    pub pass: usize,
    /// Failing assertions recorded during the test.
    pub fail: usize,
    /// Uncaught errors attributed to the test (0 or 1 per run).
    pub error: usize,
}

/// Aggregated result of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Counters for every selected test, keyed by name.
    pub per_test: BTreeMap<String, TestCounters>,
    /// Total assertions evaluated across the run.
    pub count_asserts: usize,
    /// Number of tests actually invoked.
    pub tests_run: usize,
    /// Distinct tests with at least one failed assertion.
    pub failed_tests: usize,
    /// Distinct tests that erred.
    pub erred_tests: usize,
    /// Whether the loop stopped before the last selected test.
    pub aborted_early: bool,
    /// Process status: 0 iff both aggregates are zero.
    pub status: i32,
    /// Ordered error log collected during the run.
    pub error_log: Vec<ErrorEntry>,
}

impl RunSummary {
    /// Column totals across all selected tests.
    pub fn totals(&self) -> TestCounters {
        let mut totals = TestCounters::default();
        for counters in self.per_test.values() {
            totals.pass += counters.pass;
            totals.fail += counters.fail;
            totals.error += counters.error;
        }
        totals
    }
}

impl Tester {
    fn reset_run(&mut self, selected: &[String]) {
        self.assertion_pass.clear();
        self.assertion_fail.clear();
        self.test_error.clear();
        self.errors.clear();
        self.count_asserts = 0;
        for name in selected {
            self.assertion_pass.insert(name.clone(), 0);
            self.assertion_fail.insert(name.clone(), 0);
            self.test_error.insert(name.clone(), 0);
        }
    }

    /// Runs the selected tests, writing progress and the report to `out`.
    ///
    /// Tests execute strictly sequentially in lexicographic name order.
    /// Each body is invoked at the result-union boundary: an `Err` return
    /// is recorded as a test error and the loop continues, unless rethrow
    /// mode is active, in which case the error propagates out of the run.
    pub fn run<W: Write>(
        &mut self,
        opts: &RunOptions,
        out: &mut W,
    ) -> Result<RunSummary, TtkError> {
        let selected = self.select(&opts.patterns)?;
        self.reset_run(&selected);
        self.full_tensors = opts.full_tensors;

        // Rc clones let the loop hold the bodies while handing the engine
        // to each of them mutably.
        let bodies: Vec<(String, TestFn)> = selected
            .iter()
            .map(|name| (name.clone(), Rc::clone(&self.tests[name])))
            .collect();

        let style = if opts.color { Style::Ansi } else { Style::Plain };
        let mut reporter = Reporter::new(out, style);
        reporter.header(bodies.len()).map_err(wrap_io)?;

        let mut tests_run = 0;
        let mut aborted_early = false;
        for (idx, (name, body)) in bodies.iter().enumerate() {
            self.cur_test_name = name.clone();
            reporter.begin_test(name).map_err(wrap_io)?;
            let fails_before = self.fail_count(name);
            let outcome = match body(self) {
                Ok(()) => {
                    if self.fail_count(name) > fails_before {
                        TestOutcome::Fail
                    } else {
                        TestOutcome::Pass
                    }
                }
                Err(err) if opts.rethrow => return Err(err),
                Err(err) => {
                    *self.test_error.entry(name.clone()).or_insert(0) += 1;
                    self.errors.push(ErrorEntry {
                        test: name.clone(),
                        message: err.to_string(),
                        context: "uncaught error".to_string(),
                    });
                    TestOutcome::Error
                }
            };
            tests_run += 1;
            reporter.end_test(outcome).map_err(wrap_io)?;
            if opts.early_abort && outcome != TestOutcome::Pass && idx + 1 < bodies.len() {
                aborted_early = true;
                reporter.aborted(bodies.len() - idx - 1).map_err(wrap_io)?;
                break;
            }
        }
        self.cur_test_name.clear();

        let per_test: BTreeMap<String, TestCounters> = selected
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    TestCounters {
                        pass: self.pass_count(name),
                        fail: self.fail_count(name),
                        error: self.error_count(name),
                    },
                )
            })
            .collect();
        let failed_tests = per_test.values().filter(|c| c.fail > 0).count();
        let erred_tests = per_test.values().filter(|c| c.error > 0).count();
        let status = i32::from(failed_tests > 0 || erred_tests > 0);

        let summary = RunSummary {
            per_test,
            count_asserts: self.count_asserts,
            tests_run,
            failed_tests,
            erred_tests,
            aborted_early,
            status,
            error_log: self.errors.clone(),
        };

        reporter
            .summary(
                summary.count_asserts,
                summary.tests_run,
                summary.failed_tests,
                summary.erred_tests,
            )
            .map_err(wrap_io)?;
        if !opts.summary_only {
            reporter.error_log(&summary.error_log).map_err(wrap_io)?;
        }
        if let Some(path) = &opts.log_output {
            logfile::write_log(path, &summary)?;
        }
        Ok(summary)
    }

    /// Convenience wrapper running against standard output.
    pub fn run_stdout(&mut self, opts: &RunOptions) -> Result<RunSummary, TtkError> {
        let mut stdout = io::stdout();
        self.run(opts, &mut stdout)
    }
}

fn wrap_io(err: io::Error) -> TtkError {
    TtkError::Io(ErrorInfo::new("report-write", "failed to write run report").with_hint(err.to_string()))
}
