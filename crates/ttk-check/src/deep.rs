//! Generalized tolerance-aware equality over the tagged value model.

use ttk_core::{Value, ValueKind};

use crate::outcome::CheckOutcome;
use crate::tensors::tensors_equal;

/// Compares `got` against `expected`, dispatching on the classification of
/// `expected`.
///
/// Containers recurse entrywise with key-path prefixes on failure notes and
/// report a size mismatch distinctly from a value mismatch. Arrays apply
/// [`tensors_equal`] semantics including the shape checks. Scalars pass iff
/// `|got - expected| <= precision`; a precision of zero demands an exact
/// match. A classification mismatch between the operands is reported as a
/// type mismatch, distinct from any value diagnostic.
pub fn deep_equal(got: &Value, expected: &Value, precision: f64) -> CheckOutcome {
    if got.kind() != expected.kind() {
        return CheckOutcome::failed(format!(
            "type mismatch: expected {}, got {}",
            expected.kind_label(),
            got.kind_label()
        ));
    }
    match expected.kind() {
        ValueKind::Container => containers_equal(got, expected, precision),
        ValueKind::Array => match (got, expected) {
            (Value::Tensor(g), Value::Tensor(e)) => tensors_equal(g, e, precision),
            _ => CheckOutcome::failed("type mismatch: expected tensor"),
        },
        ValueKind::Scalar => match (got, expected) {
            (Value::Scalar(g), Value::Scalar(e)) => {
                if (g - e).abs() <= precision {
                    CheckOutcome::passed()
                } else {
                    CheckOutcome::failed(format!(
                        "value mismatch: {g} vs {e} (precision {precision})"
                    ))
                }
            }
            _ => CheckOutcome::failed("type mismatch: expected scalar"),
        },
        ValueKind::Opaque => {
            if got == expected {
                CheckOutcome::passed()
            } else {
                CheckOutcome::failed(format!("value mismatch: {got:?} vs {expected:?}"))
            }
        }
    }
}

fn containers_equal(got: &Value, expected: &Value, precision: f64) -> CheckOutcome {
    let (tg, te) = match (got, expected) {
        (Value::Table(tg), Value::Table(te)) => (tg, te),
        _ => return CheckOutcome::failed("type mismatch: expected table"),
    };
    if tg.len() != te.len() {
        return CheckOutcome::failed(format!(
            "table size mismatch: expected {} entries, got {}",
            te.len(),
            tg.len()
        ));
    }
    for (key, ve) in te {
        let vg = match tg.get(key) {
            Some(vg) => vg,
            None => return CheckOutcome::failed(format!("missing key `{key}`")),
        };
        let child = deep_equal(vg, ve, precision);
        if !child.pass {
            let note = child.note.unwrap_or_else(|| "mismatch".to_string());
            return CheckOutcome::failed(format!("at key `{key}`: {note}"));
        }
    }
    CheckOutcome::passed()
}
