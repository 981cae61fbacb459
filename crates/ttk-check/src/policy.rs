use serde::{Deserialize, Serialize};

/// Tolerance policy controlling comparison behaviour.
///
/// The approximate-equality default is deliberately a policy field rather
/// than a constant at call sites: suites comparing single-precision outputs
/// typically loosen it, bit-exact kernels tighten it to zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckPolicy {
    /// Default tolerance applied by approximate floating equality.
    #[serde(default = "CheckPolicy::default_almost_tol")]
    pub almost_tol: f64,
    /// Element count above which tensor diagnostics are summarized.
    #[serde(default = "CheckPolicy::default_preview_limit")]
    pub preview_limit: usize,
}

impl CheckPolicy {
    const fn default_almost_tol() -> f64 {
        1e-12
    }

    const fn default_preview_limit() -> usize {
        8
    }
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            almost_tol: Self::default_almost_tol(),
            preview_limit: Self::default_preview_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_from_empty_json() {
        let policy: CheckPolicy = serde_json::from_str("{}").expect("defaults");
        assert_eq!(policy, CheckPolicy::default());
        assert_eq!(policy.almost_tol, 1e-12);
        assert_eq!(policy.preview_limit, 8);
    }

    #[test]
    fn serialized_form_is_stable() {
        let text = serde_json::to_string(&CheckPolicy::default()).expect("encode");
        assert_eq!(text, r#"{"almost_tol":1e-12,"preview_limit":8}"#);
    }
}
