//! Diagnostics module.
//!
//! Structured compile-time diagnostics with error codes and the
//! class/method location they were raised in, plus report rendering.

pub mod aggregator;
pub mod diagnostic;
pub mod error_codes;
pub mod format;
pub mod types;

pub use aggregator::{
    DEFAULT_MAX_ERRORS, DiagnosticCounts, DiagnosticsAggregator, DiagnosticsReport, render_report,
};
pub use diagnostic::{Diagnostic, render_diagnostics};
pub use format::format_message;
pub use types::{ErrorCode, ErrorType};

pub use error_codes::*;

/// Result of a fallible compilation step.
pub type CompileResult<T> = Result<T, Box<Diagnostic>>;
