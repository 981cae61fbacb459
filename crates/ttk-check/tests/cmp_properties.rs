use ttk_core::{table, Tensor, Value};

use proptest::prelude::*;
use ttk_check::{deep_equal, tables_equal, tensors_equal, tensors_not_equal};

fn tensor_from(data: Vec<f64>) -> Tensor {
    let len = data.len();
    Tensor::from_f64(&data, &[len]).unwrap()
}

proptest! {
    #[test]
    fn reflexive_at_zero_tolerance(data in proptest::collection::vec(-1e6..1e6f64, 1..64)) {
        let t = tensor_from(data);
        let outcome = tensors_equal(&t, &t, 0.0);
        prop_assert!(outcome.pass);
        prop_assert!(outcome.note.is_none());
    }

    #[test]
    fn polarities_complement_on_matching_shapes(
        a in proptest::collection::vec(-1e3..1e3f64, 8),
        b in proptest::collection::vec(-1e3..1e3f64, 8),
        tol in 0.0..10.0f64,
    ) {
        let ta = tensor_from(a);
        let tb = tensor_from(b);
        let eq = tensors_equal(&ta, &tb, tol).pass;
        let ne = tensors_not_equal(&ta, &tb, tol).pass;
        prop_assert_ne!(eq, ne);
    }

    // Polarity complement does NOT extend to shape-mismatched pairs: such a
    // pair is never equal, so it fails the equality check and passes the
    // inequality check simultaneously.
    #[test]
    fn shape_mismatch_passes_both_negative_verdicts(
        data in proptest::collection::vec(-1e3..1e3f64, 4),
        tol in 0.0..1e9f64,
    ) {
        let a = tensor_from(data);
        let b = Tensor::zeros(&[2, 2]);
        prop_assert!(!tensors_equal(&a, &b, tol).pass);
        prop_assert!(tensors_not_equal(&a, &b, tol).pass);
    }

    #[test]
    fn table_equality_is_symmetric(
        x in -1e6..1e6f64,
        y in -1e6..1e6f64,
        drop_key in proptest::bool::ANY,
    ) {
        let a = table([("x", x), ("y", y)]);
        let b = if drop_key {
            table([("x", x)])
        } else {
            table([("x", x), ("y", y)])
        };
        prop_assert_eq!(tables_equal(&a, &b), tables_equal(&b, &a));
    }

    #[test]
    fn deep_equal_scalar_matches_absolute_difference(
        got in -1e6..1e6f64,
        expected in -1e6..1e6f64,
        precision in 0.0..1e3f64,
    ) {
        let outcome = deep_equal(&Value::Scalar(got), &Value::Scalar(expected), precision);
        prop_assert_eq!(outcome.pass, (got - expected).abs() <= precision);
    }
}
