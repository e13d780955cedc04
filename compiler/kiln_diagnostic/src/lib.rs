//! Diagnostic system for trait compilation.
//!
//! Every user-facing failure the orchestrator or a handler reports is a
//! [`Diagnostic`]: a code, a message, an optional anchor span and notes.
//!
//! Diagnostics are recoverable by construction. Anything that should abort a
//! compilation pass is an internal error owned by the orchestrator crate, not
//! a diagnostic.

mod diagnostic;
mod error_code;

pub use diagnostic::{incompatible_markers, Anchor, Diagnostic, Severity};
pub use error_code::ErrorCode;
