//! Tolerance-aware tensor comparisons.

use ttk_core::{NumericArray, Tensor};

use crate::outcome::CheckOutcome;

/// Shared shape/difference analysis both comparison polarities branch on.
enum Verdict {
    DimMismatch { a: usize, b: usize },
    SizeMismatch { dim: usize, a: usize, b: usize },
    MaxDiff(f64),
}

fn analyze<A: NumericArray>(a: &A, b: &A) -> Verdict {
    if a.ndim() != b.ndim() {
        return Verdict::DimMismatch {
            a: a.ndim(),
            b: b.ndim(),
        };
    }
    for dim in 0..a.ndim() {
        let (sa, sb) = (a.size(dim), b.size(dim));
        if sa != sb {
            return Verdict::SizeMismatch {
                dim,
                a: sa.unwrap_or(0),
                b: sb.unwrap_or(0),
            };
        }
    }
    // Narrow integer elements are promoted before differencing so the
    // subtraction cannot overflow.
    let widen = a.dtype().is_narrow_int() || b.dtype().is_narrow_int();
    let diff = if widen {
        a.widen().sub(&b.widen())
    } else {
        a.sub(b)
    };
    match diff {
        Ok(d) => Verdict::MaxDiff(d.abs().max_all()),
        // Shapes were validated above; a collaborator refusing the
        // subtraction anyway surfaces as an unbounded difference.
        Err(_) => Verdict::MaxDiff(f64::INFINITY),
    }
}

/// Compares two arrays for elementwise equality within `tolerance`.
///
/// Dimensionality and per-dimension size mismatches fail with distinct
/// notes; otherwise the pair is equal iff the maximum absolute elementwise
/// difference does not exceed `tolerance`.
pub fn tensors_equal<A: NumericArray>(a: &A, b: &A, tolerance: f64) -> CheckOutcome {
    match analyze(a, b) {
        Verdict::DimMismatch { a, b } => {
            CheckOutcome::failed(format!("different dimensions: {a} vs {b}"))
        }
        Verdict::SizeMismatch { dim, a, b } => CheckOutcome::failed(format!(
            "different sizes: dimension {dim} is {a} vs {b}"
        )),
        Verdict::MaxDiff(diff) => {
            if diff <= tolerance {
                CheckOutcome::passed()
            } else {
                CheckOutcome::failed(format!(
                    "max absolute difference {diff} exceeds tolerance {tolerance}"
                ))
            }
        }
    }
}

/// Negated polarity of [`tensors_equal`], sharing its decision path.
///
/// A shape-mismatched pair is never equal, so it passes the inequality
/// check under both the dimension and the size branch.
pub fn tensors_not_equal<A: NumericArray>(a: &A, b: &A, tolerance: f64) -> CheckOutcome {
    match analyze(a, b) {
        Verdict::DimMismatch { .. } | Verdict::SizeMismatch { .. } => CheckOutcome::passed(),
        Verdict::MaxDiff(diff) => {
            if diff <= tolerance {
                CheckOutcome::failed(format!(
                    "max absolute difference {diff} is within tolerance {tolerance}"
                ))
            } else {
                CheckOutcome::passed()
            }
        }
    }
}

/// Renders a tensor for diagnostic messages.
///
/// Large tensors are summarized to their dtype, shape, and leading elements
/// unless `full` is set.
pub fn tensor_preview(t: &Tensor, full: bool, limit: usize) -> String {
    let elems = t.to_f64_vec();
    if full || elems.len() <= limit {
        format!("{:?}{:?}", t.dtype(), elems)
    } else {
        let head: Vec<String> = elems[..limit].iter().map(|x| x.to_string()).collect();
        format!(
            "{:?} shape={:?} [{}, ... {} more]",
            t.dtype(),
            t.shape(),
            head.join(", "),
            elems.len() - limit
        )
    }
}
