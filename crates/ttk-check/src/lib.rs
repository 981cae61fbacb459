#![deny(missing_docs)]
#![doc = "Tolerance-aware equality core: tensor, table, and deep structural comparisons."]

/// Generalized tagged-value comparison.
pub mod deep;
/// Comparison outcome type shared by all routines.
pub mod outcome;
/// Tolerance policy definitions.
pub mod policy;
/// Recursive container equality.
pub mod tables;
/// Tensor comparisons and diagnostic previews.
pub mod tensors;

pub use deep::deep_equal;
pub use outcome::CheckOutcome;
pub use policy::CheckPolicy;
pub use tables::tables_equal;
pub use tensors::{tensor_preview, tensors_equal, tensors_not_equal};
