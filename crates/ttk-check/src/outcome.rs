use serde::{Deserialize, Serialize};

/// Result of a single comparison: a verdict plus an optional note explaining
/// a negative verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Whether the comparison succeeded.
    pub pass: bool,
    /// Diagnostic surfaced when the comparison fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CheckOutcome {
    /// Successful comparison.
    pub fn passed() -> Self {
        Self {
            pass: true,
            note: None,
        }
    }

    /// Failed comparison with an explanatory note.
    pub fn failed(note: impl Into<String>) -> Self {
        Self {
            pass: false,
            note: Some(note.into()),
        }
    }
}
