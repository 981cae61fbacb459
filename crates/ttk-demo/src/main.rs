//! Sample TTK suite binary.
//!
//! Demonstrates the embedding pattern: build a [`Tester`], register tests,
//! hand control to `main()`. Run with `--list`, `--early-abort`, or a name
//! pattern to exercise the CLI surface.

use std::process::ExitCode;

use ttk_core::{table, NumericArray, Tensor, Value};
use ttk_run::Tester;

fn register(t: &mut Tester) {
    t.add("tensor.seeded_reproducibility", |t| {
        let a = Tensor::random(&[8, 8], 2024);
        let b = Tensor::random(&[8, 8], 2024);
        t.assert_tensor_eq(&a, &b, 0.0, "same seed, same contents");
        Ok(())
    });

    t.add("tensor.widening_survives_extremes", |t| {
        let a = Tensor::from_i8(&[-128, 127, 0], &[3])?;
        let b = Tensor::from_i8(&[127, -128, 0], &[3])?;
        t.assert_tensor_ne(&a, &b, 254.0, "extreme i8 values differ");
        t.assert_tensor_eq(&a, &b, 255.0, "but only by 255");
        Ok(())
    });

    t.add("tensor.shape_guard", |t| {
        let a = Tensor::zeros(&[2, 3]);
        let b = Tensor::zeros(&[3, 2]);
        t.assert_tensor_ne(&a, &b, 1e9, "transposed shapes never match");
        t.assert_error(
            || {
                let a = Tensor::zeros(&[2]);
                let b = Tensor::zeros(&[3]);
                a.sub(&b).map(|_| ())
            },
            "elementwise subtraction rejects shape mismatch",
        );
        Ok(())
    });

    t.add("table.metrics_snapshot", |t| {
        let got = table([
            ("loss", Value::Scalar(0.02502)),
            ("accuracy", Value::Scalar(0.98001)),
        ]);
        let expected = table([
            ("loss", Value::Scalar(0.025)),
            ("accuracy", Value::Scalar(0.98)),
        ]);
        t.assert_table_eq(&got, &expected, 1e-3, "metrics within reporting precision");
        t.assert_table_ne(&got, &expected, 1e-9, "but not bit-identical");
        Ok(())
    });

    t.add("scalar.ordering", |t| {
        t.assert_lt(0.1, 0.2, "losses decrease");
        t.assert_almost_eq(0.1 + 0.2, 0.3, "floating accumulation");
        Ok(())
    });
}

fn main() -> ExitCode {
    let mut tester = Tester::new();
    register(&mut tester);
    tester.main()
}
