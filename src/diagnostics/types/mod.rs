//! Type definitions for the diagnostics system

mod error_code;

pub use error_code::{ErrorCode, ErrorType};
