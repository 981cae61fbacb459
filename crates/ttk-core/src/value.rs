//! Tagged value model for structural comparisons.
//!
//! The equality core never duck-types: every value is classified into one of
//! the [`ValueKind`] tags and dispatched to a comparison routine per tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tensor::Tensor;

/// A runtime value the structural equality routines can compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Numeric scalar.
    Scalar(f64),
    /// Boolean leaf, compared by value.
    Bool(bool),
    /// String leaf, compared by value.
    Str(String),
    /// Numeric array.
    Tensor(Tensor),
    /// Keyed container; BTreeMap keeps recursion order deterministic.
    Table(BTreeMap<String, Value>),
}

/// Comparison category a [`Value`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Numeric scalar compared with a precision.
    Scalar,
    /// Tensor compared elementwise with a tolerance.
    Array,
    /// Keyed container compared by recursive containment.
    Container,
    /// Leaf compared by plain value equality.
    Opaque,
}

impl Value {
    /// Classifies the value into its comparison category.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Tensor(_) => ValueKind::Array,
            Value::Table(_) => ValueKind::Container,
            Value::Bool(_) | Value::Str(_) => ValueKind::Opaque,
        }
    }

    /// Short label used in type-mismatch diagnostics.
    pub fn kind_label(&self) -> &'static str {
        match self.kind() {
            ValueKind::Scalar => "scalar",
            ValueKind::Array => "tensor",
            ValueKind::Container => "table",
            ValueKind::Opaque => "opaque",
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<Tensor> for Value {
    fn from(v: Tensor) -> Self {
        Value::Tensor(v)
    }
}

/// Builds a [`Value::Table`] from name/value pairs.
pub fn table<I, K, V>(entries: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Value::Table(
        entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_covers_all_tags() {
        assert_eq!(Value::Scalar(1.0).kind(), ValueKind::Scalar);
        assert_eq!(Value::from(true).kind(), ValueKind::Opaque);
        assert_eq!(table([("a", 1.0)]).kind(), ValueKind::Container);
        assert_eq!(
            Value::Tensor(Tensor::zeros(&[2])).kind(),
            ValueKind::Array
        );
    }
}
