//! Recursive structural equality for keyed containers.

use ttk_core::Value;

use crate::tensors::tensors_equal;

/// Leaf equality used once recursion reaches non-container values.
fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Scalar(x), Value::Scalar(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Tensor(x), Value::Tensor(y)) => tensors_equal(x, y, 0.0).pass,
        (Value::Table(_), Value::Table(_)) => tables_equal(a, b),
        _ => false,
    }
}

/// Recursive bidirectional containment check.
///
/// Every entry of `a` must equal the corresponding entry of `b` and vice
/// versa, so asymmetric key sets are unequal: a missing key compares against
/// an absent value, which a present entry can never equal. Two empty tables
/// are equal. Non-table operands fall back to leaf value equality.
pub fn tables_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Table(ta), Value::Table(tb)) => {
            ta.iter().all(|(k, va)| match tb.get(k) {
                Some(vb) => value_eq(va, vb),
                None => false,
            }) && tb.keys().all(|k| ta.contains_key(k))
        }
        _ => value_eq(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttk_core::{table, Tensor, Value};

    #[test]
    fn empty_tables_are_equal() {
        let a = table(Vec::<(String, Value)>::new());
        let b = table(Vec::<(String, Value)>::new());
        assert!(tables_equal(&a, &b));
    }

    #[test]
    fn asymmetric_keys_are_unequal_both_ways() {
        let small = table([("a", 1.0)]);
        let big = table([("a", 1.0), ("b", 2.0)]);
        assert!(!tables_equal(&small, &big));
        assert!(!tables_equal(&big, &small));
    }

    #[test]
    fn is_symmetric() {
        let a = table([("x", 1.0), ("y", 2.0)]);
        let b = table([("y", 2.0), ("x", 1.0)]);
        assert!(tables_equal(&a, &b));
        assert!(tables_equal(&b, &a));
    }

    #[test]
    fn nested_tables_recurse() {
        let a = Value::Table(
            [("inner".to_string(), table([("v", 3.0)]))]
                .into_iter()
                .collect(),
        );
        let b = Value::Table(
            [("inner".to_string(), table([("v", 3.0)]))]
                .into_iter()
                .collect(),
        );
        let c = Value::Table(
            [("inner".to_string(), table([("v", 4.0)]))]
                .into_iter()
                .collect(),
        );
        assert!(tables_equal(&a, &b));
        assert!(!tables_equal(&a, &c));
    }

    #[test]
    fn tensor_leaves_require_exact_equality() {
        let a = table([("t", Tensor::from_f64(&[1.0], &[1]).unwrap())]);
        let b = table([("t", Tensor::from_f64(&[1.0], &[1]).unwrap())]);
        let c = table([("t", Tensor::from_f64(&[1.0 + 1e-9], &[1]).unwrap())]);
        assert!(tables_equal(&a, &b));
        assert!(!tables_equal(&a, &c));
    }
}
