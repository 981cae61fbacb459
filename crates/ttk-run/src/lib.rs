#![deny(missing_docs)]
#![doc = "Test registry, assertion engine, execution driver, and reporter for the TTK engine."]

/// Tester state and assertion vocabulary.
pub mod assert;
/// Command-line surface for suite binaries.
pub mod cli;
/// Run loop and summaries.
pub mod driver;
/// Machine-readable log sink.
pub mod logfile;
/// Console reporter and color strategy.
pub mod report;
/// Registration and selection.
pub mod registry;

pub use assert::{ErrorEntry, TestFn, Tester};
pub use cli::RunArgs;
pub use driver::{RunOptions, RunSummary, TestCounters};
pub use logfile::{render_log, write_log};
pub use report::{Reporter, Style, TestOutcome};

use ttk_core::{ErrorInfo, TtkError};

/// Builds an uncaught-error value for use inside test bodies.
///
/// Returning `Err(raise("…"))` from a test marks it as erred rather than
/// failed, mirroring an exception escaping the body.
pub fn raise(message: impl Into<String>) -> TtkError {
    TtkError::Run(ErrorInfo::new("uncaught", message.into()))
}
