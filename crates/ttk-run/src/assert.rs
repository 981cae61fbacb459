//! The stateful [`Tester`] engine: per-test counters, the pass/fail
//! recorder, and the assertion vocabulary.

use std::collections::BTreeMap;
use std::panic::Location;
use std::rc::Rc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ttk_check::{deep_equal, tensor_preview, tensors_equal, tensors_not_equal, CheckPolicy};
use ttk_core::{Tensor, TtkError, Value};

/// A registered test body.
///
/// Tests receive the engine so they can record assertions; an `Err` escaping
/// the body is counted as a test error, distinct from any failed assertion.
pub type TestFn = Rc<dyn Fn(&mut Tester) -> Result<(), TtkError>>;

/// One composed diagnostic in the run's error log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Test the diagnostic is attributed to.
    pub test: String,
    /// Formatted failure or error message.
    pub message: String,
    /// Abbreviated call-site context (`file:line:column` for assertions).
    pub context: String,
}

/// Stateful test engine: registry, counters, and error log.
///
/// A `Tester` is created once per session, populated through the
/// registration calls, and may be reused across runs; every run resets the
/// counter maps and the error log. `cur_test_name` is a single mutable
/// cursor owned by the driver loop and is not reentrant.
pub struct Tester {
    pub(crate) tests: BTreeMap<String, TestFn>,
    pub(crate) assertion_pass: BTreeMap<String, usize>,
    pub(crate) assertion_fail: BTreeMap<String, usize>,
    pub(crate) test_error: BTreeMap<String, usize>,
    pub(crate) count_asserts: usize,
    pub(crate) errors: Vec<ErrorEntry>,
    pub(crate) cur_test_name: String,
    pub(crate) policy: CheckPolicy,
    pub(crate) full_tensors: bool,
}

impl Default for Tester {
    fn default() -> Self {
        Self::new()
    }
}

impl Tester {
    /// Creates an empty engine with the default tolerance policy.
    pub fn new() -> Self {
        Self {
            tests: BTreeMap::new(),
            assertion_pass: BTreeMap::new(),
            assertion_fail: BTreeMap::new(),
            test_error: BTreeMap::new(),
            count_asserts: 0,
            errors: Vec::new(),
            cur_test_name: String::new(),
            policy: CheckPolicy::default(),
            full_tensors: false,
        }
    }

    /// Replaces the tolerance policy used by approximate assertions.
    pub fn with_policy(mut self, policy: CheckPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Total assertions recorded during the current run.
    pub fn count_asserts(&self) -> usize {
        self.count_asserts
    }

    /// Passing assertion count for a test.
    pub fn pass_count(&self, name: &str) -> usize {
        self.assertion_pass.get(name).copied().unwrap_or(0)
    }

    /// Failing assertion count for a test.
    pub fn fail_count(&self, name: &str) -> usize {
        self.assertion_fail.get(name).copied().unwrap_or(0)
    }

    /// Uncaught-error count for a test.
    pub fn error_count(&self, name: &str) -> usize {
        self.test_error.get(name).copied().unwrap_or(0)
    }

    /// Ordered error log accumulated during the current run.
    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }

    /// Records an assertion outcome against the current test.
    ///
    /// The diagnostic producer is only evaluated when the assertion fails,
    /// keeping the passing path free of formatting cost. Returns the
    /// outcome so callers can chain further assertions after a failure.
    #[track_caller]
    pub fn check(&mut self, pass: bool, message: impl FnOnce() -> String) -> bool {
        self.count_asserts += 1;
        let name = self.cur_test_name.clone();
        if pass {
            *self.assertion_pass.entry(name).or_insert(0) += 1;
        } else {
            *self.assertion_fail.entry(name.clone()).or_insert(0) += 1;
            let loc = Location::caller();
            self.errors.push(ErrorEntry {
                test: name,
                message: message(),
                context: format!("{}:{}:{}", loc.file(), loc.line(), loc.column()),
            });
        }
        pass
    }

    /// Asserts that a condition holds.
    #[track_caller]
    pub fn assert_true(&mut self, condition: bool, msg: &str) -> bool {
        self.check(condition, || format!("condition is false ({msg})"))
    }

    /// Asserts `a < b`.
    #[track_caller]
    pub fn assert_lt(&mut self, a: f64, b: f64, msg: &str) -> bool {
        self.check(a < b, || format!("{a} < {b} violated ({msg})"))
    }

    /// Asserts `a <= b`.
    #[track_caller]
    pub fn assert_le(&mut self, a: f64, b: f64, msg: &str) -> bool {
        self.check(a <= b, || format!("{a} <= {b} violated ({msg})"))
    }

    /// Asserts `a > b`.
    #[track_caller]
    pub fn assert_gt(&mut self, a: f64, b: f64, msg: &str) -> bool {
        self.check(a > b, || format!("{a} > {b} violated ({msg})"))
    }

    /// Asserts `a >= b`.
    #[track_caller]
    pub fn assert_ge(&mut self, a: f64, b: f64, msg: &str) -> bool {
        self.check(a >= b, || format!("{a} >= {b} violated ({msg})"))
    }

    /// Asserts exact numeric equality.
    #[track_caller]
    pub fn assert_eq_num(&mut self, a: f64, b: f64, msg: &str) -> bool {
        self.check(a == b, || format!("{a} == {b} violated ({msg})"))
    }

    /// Asserts exact numeric inequality.
    #[track_caller]
    pub fn assert_ne_num(&mut self, a: f64, b: f64, msg: &str) -> bool {
        self.check(a != b, || format!("{a} != {b} violated ({msg})"))
    }

    /// Asserts approximate equality under the policy's default tolerance.
    #[track_caller]
    pub fn assert_almost_eq(&mut self, a: f64, b: f64, msg: &str) -> bool {
        let tol = self.policy.almost_tol;
        self.check((a - b).abs() <= tol, || {
            format!("|{a} - {b}| > {tol} ({msg})")
        })
    }

    /// Asserts elementwise tensor equality within `tolerance`.
    #[track_caller]
    pub fn assert_tensor_eq(&mut self, a: &Tensor, b: &Tensor, tolerance: f64, msg: &str) -> bool {
        let outcome = tensors_equal(a, b, tolerance);
        let (full, limit) = (self.full_tensors, self.policy.preview_limit);
        self.check(outcome.pass, || {
            format!(
                "tensors unequal: {} | got {} expected {} ({msg})",
                outcome.note.unwrap_or_default(),
                tensor_preview(a, full, limit),
                tensor_preview(b, full, limit),
            )
        })
    }

    /// Asserts elementwise tensor inequality beyond `tolerance`.
    #[track_caller]
    pub fn assert_tensor_ne(&mut self, a: &Tensor, b: &Tensor, tolerance: f64, msg: &str) -> bool {
        let outcome = tensors_not_equal(a, b, tolerance);
        let (full, limit) = (self.full_tensors, self.policy.preview_limit);
        self.check(outcome.pass, || {
            format!(
                "tensors equal: {} | got {} ({msg})",
                outcome.note.unwrap_or_default(),
                tensor_preview(a, full, limit),
            )
        })
    }

    /// Asserts structural equality of two values at the given precision.
    #[track_caller]
    pub fn assert_table_eq(
        &mut self,
        got: &Value,
        expected: &Value,
        precision: f64,
        msg: &str,
    ) -> bool {
        let outcome = deep_equal(got, expected, precision);
        self.check(outcome.pass, || {
            format!(
                "values unequal: {} ({msg})",
                outcome.note.unwrap_or_default()
            )
        })
    }

    /// Asserts structural inequality of two values at the given precision.
    #[track_caller]
    pub fn assert_table_ne(
        &mut self,
        got: &Value,
        expected: &Value,
        precision: f64,
        msg: &str,
    ) -> bool {
        let outcome = deep_equal(got, expected, precision);
        self.check(!outcome.pass, || {
            format!("values equal within precision {precision} ({msg})")
        })
    }

    /// General error assertion all other error assertions wrap.
    ///
    /// Invokes `f` at the result-union boundary; success requires that the
    /// raised/not-raised status matches `expects_error` and that the raised
    /// value (`None` when nothing was raised) satisfies `predicate`.
    #[track_caller]
    pub fn assert_error_obj<F, P>(
        &mut self,
        f: F,
        expects_error: bool,
        predicate: P,
        msg: &str,
    ) -> bool
    where
        F: FnOnce() -> Result<(), TtkError>,
        P: FnOnce(Option<&TtkError>) -> bool,
    {
        let raised = f().err();
        let status_ok = raised.is_some() == expects_error;
        let pass = status_ok && predicate(raised.as_ref());
        self.check(pass, || match (&raised, expects_error) {
            (None, true) => format!("expected an error but none was raised ({msg})"),
            (Some(err), false) => format!("unexpected error raised: {err} ({msg})"),
            (Some(err), true) => format!("raised error rejected by predicate: {err} ({msg})"),
            (None, false) => format!("no error raised but predicate rejected it ({msg})"),
        })
    }

    /// Asserts that the callable raises some error.
    #[track_caller]
    pub fn assert_error<F>(&mut self, f: F, msg: &str) -> bool
    where
        F: FnOnce() -> Result<(), TtkError>,
    {
        self.assert_error_obj(f, true, |_| true, msg)
    }

    /// Asserts that the callable raises no error.
    #[track_caller]
    pub fn assert_no_error<F>(&mut self, f: F, msg: &str) -> bool
    where
        F: FnOnce() -> Result<(), TtkError>,
    {
        self.assert_error_obj(f, false, |_| true, msg)
    }

    /// Asserts that the callable raises an error whose message matches
    /// `expected` exactly.
    #[track_caller]
    pub fn assert_error_msg<F>(&mut self, f: F, expected: &str, msg: &str) -> bool
    where
        F: FnOnce() -> Result<(), TtkError>,
    {
        self.assert_error_obj(
            f,
            true,
            |err| err.map(|e| e.info().message == expected).unwrap_or(false),
            msg,
        )
    }

    /// Asserts that the callable raises an error whose rendering matches the
    /// given regular expression.
    #[track_caller]
    pub fn assert_error_pattern<F>(&mut self, f: F, pattern: &str, msg: &str) -> bool
    where
        F: FnOnce() -> Result<(), TtkError>,
    {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(err) => {
                return self.check(false, || {
                    format!("invalid error pattern `{pattern}`: {err} ({msg})")
                })
            }
        };
        self.assert_error_obj(
            f,
            true,
            |err| err.map(|e| re.is_match(&e.to_string())).unwrap_or(false),
            msg,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttk_core::ErrorInfo;

    fn boom() -> Result<(), TtkError> {
        Err(TtkError::Run(ErrorInfo::new("boom", "division by zero")))
    }

    fn quiet() -> Result<(), TtkError> {
        Ok(())
    }

    fn in_test() -> Tester {
        let mut t = Tester::new();
        t.cur_test_name = "unit".to_string();
        t
    }

    #[test]
    fn recorder_keeps_running_totals() {
        let mut t = in_test();
        assert!(t.assert_true(true, "ok"));
        assert!(!t.assert_lt(2.0, 1.0, "ordering"));
        assert_eq!(t.count_asserts(), 2);
        assert_eq!(t.pass_count("unit"), 1);
        assert_eq!(t.fail_count("unit"), 1);
        assert_eq!(t.errors().len(), 1);
        assert!(t.errors()[0].message.contains("2 < 1 violated"));
        assert!(t.errors()[0].context.contains("assert.rs"));
    }

    #[test]
    fn failed_assertion_does_not_stop_recording() {
        let mut t = in_test();
        t.assert_eq_num(1.0, 2.0, "first");
        t.assert_eq_num(3.0, 3.0, "second");
        assert_eq!(t.pass_count("unit"), 1);
        assert_eq!(t.fail_count("unit"), 1);
    }

    #[test]
    fn almost_eq_uses_policy_default() {
        let mut t = in_test();
        assert!(t.assert_almost_eq(1.0, 1.0 + 1e-13, "tight"));
        assert!(!t.assert_almost_eq(1.0, 1.0 + 1e-6, "loose"));
    }

    #[test]
    fn almost_eq_tolerance_is_tunable_per_session() {
        let mut t = Tester::new().with_policy(CheckPolicy {
            almost_tol: 1e-3,
            ..CheckPolicy::default()
        });
        t.cur_test_name = "unit".to_string();
        assert!(t.assert_almost_eq(1.0, 1.0 + 1e-4, "loosened policy"));
    }

    #[test]
    fn tensor_assertions_delegate_to_equality_core() {
        let mut t = in_test();
        let a = Tensor::from_f64(&[1.0, 2.0], &[2]).unwrap();
        let b = Tensor::from_f64(&[1.0, 2.5], &[2]).unwrap();
        assert!(t.assert_tensor_eq(&a, &b, 0.5, "wide"));
        assert!(!t.assert_tensor_eq(&a, &b, 0.1, "narrow"));
        assert!(t.assert_tensor_ne(&a, &b, 0.1, "distinct"));
    }

    #[test]
    fn shape_mismatch_passes_tensor_ne() {
        let mut t = in_test();
        let a = Tensor::zeros(&[2]);
        let b = Tensor::zeros(&[3]);
        assert!(t.assert_tensor_ne(&a, &b, 1e9, "shape differs"));
    }

    #[test]
    fn error_assertions_cover_the_general_contract() {
        let mut t = in_test();
        assert!(t.assert_error(boom, "raises"));
        assert!(t.assert_no_error(quiet, "silent"));
        assert!(t.assert_error_msg(boom, "division by zero", "exact"));
        assert!(!t.assert_error_msg(boom, "other message", "exact mismatch"));
        assert!(t.assert_error_pattern(boom, "division.*zero", "pattern"));
        assert!(!t.assert_error(quiet, "missing error"));
        assert!(t.assert_error_obj(
            boom,
            true,
            |err| err.map(|e| e.info().code == "boom").unwrap_or(false),
            "predicate on code"
        ));
    }

    #[test]
    fn deferred_messages_only_run_on_failure() {
        let mut t = in_test();
        let mut evaluated = false;
        t.check(true, || {
            evaluated = true;
            String::new()
        });
        assert!(!evaluated);
    }

    #[test]
    fn large_tensor_diagnostics_are_truncated_by_default() {
        let mut t = in_test();
        let a = Tensor::zeros(&[64]);
        let b = Tensor::random(&[64], 3);
        t.assert_tensor_eq(&a, &b, 0.0, "big");
        assert!(t.errors()[0].message.contains("more]"));
    }
}
