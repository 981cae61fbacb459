//! Test registration and pattern-based selection.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use regex::Regex;
use ttk_core::{ErrorInfo, TtkError};

use crate::assert::{TestFn, Tester};

impl Tester {
    /// Registers a test body under a unique name.
    ///
    /// Registering a duplicate name overwrites the prior entry
    /// (last-write-wins); collisions are not an error.
    pub fn add<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut Tester) -> Result<(), TtkError> + 'static,
    {
        self.tests.insert(name.into(), Rc::new(f));
        self
    }

    /// Registers every entry of a name-to-body mapping.
    pub fn add_suite<I>(&mut self, suite: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, TestFn)>,
    {
        for (name, f) in suite {
            self.tests.insert(name, f);
        }
        self
    }

    /// Registers a previously computed status code as a trivial test.
    ///
    /// Zero records one passing assertion; any other value records one
    /// failing assertion carrying the code. Used to fold the result of an
    /// embedded sub-run into an outer session.
    pub fn add_status(&mut self, name: impl Into<String>, status: i32) -> &mut Self {
        self.add(name, move |t| {
            t.check(status == 0, || {
                format!("embedded suite exited with status {status}")
            });
            Ok(())
        })
    }

    /// Registers an external suite reference resolved from a file holding an
    /// integer status code.
    pub fn add_status_file(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<&mut Self, TtkError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            TtkError::Registry(
                ErrorInfo::new("suite-file-read", "failed to read suite status file")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let status: i32 = raw.trim().parse().map_err(|_| {
            TtkError::Registry(
                ErrorInfo::new("suite-file-parse", "suite status file is not an integer")
                    .with_context("path", path.display().to_string())
                    .with_context("contents", raw.trim().to_string()),
            )
        })?;
        Ok(self.add_status(name, status))
    }

    /// Number of registered tests.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Registered test names in iteration order.
    pub fn names(&self) -> Vec<String> {
        self.tests.keys().cloned().collect()
    }

    /// Resolves selection patterns to a deterministic list of test names.
    ///
    /// An empty candidate list selects every registered test. Each pattern
    /// is matched as a regular expression against all registered names (a
    /// plain string therefore behaves as a substring match); a pattern
    /// matching zero names is a usage error that fails the run outright.
    /// The union of matches is returned in lexicographic name order.
    pub fn select(&self, patterns: &[String]) -> Result<Vec<String>, TtkError> {
        if patterns.is_empty() {
            return Ok(self.names());
        }
        let mut selected = BTreeSet::new();
        for pattern in patterns {
            let re = Regex::new(pattern).map_err(|err| {
                TtkError::Usage(
                    ErrorInfo::new("invalid-pattern", "selection pattern is not a valid regex")
                        .with_context("pattern", pattern.clone())
                        .with_hint(err.to_string()),
                )
            })?;
            let matches: Vec<&String> =
                self.tests.keys().filter(|name| re.is_match(name)).collect();
            if matches.is_empty() {
                return Err(TtkError::Usage(
                    ErrorInfo::new("no-match", "selection pattern matched no registered test")
                        .with_context("pattern", pattern.clone())
                        .with_hint("list registered test names with --list"),
                ));
            }
            selected.extend(matches.into_iter().cloned());
        }
        Ok(selected.into_iter().collect())
    }
}
