//! Diagnostic codes.
//!
//! `E7xxx` codes are errors raised while compiling marked declarations,
//! `W7xxx` codes are warnings from extended checks.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Two primary markers claim the same declaration.
    E7001,
    /// Marker metadata failed analysis.
    E7003,
    /// A reference could not be resolved.
    E7004,
    /// Extended check warning.
    W7001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E7001 => "E7001",
            ErrorCode::E7003 => "E7003",
            ErrorCode::E7004 => "E7004",
            ErrorCode::W7001 => "W7001",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
