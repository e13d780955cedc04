//! Source spans.
//!
//! The orchestrator never reads source text. A span is only carried from the
//! host into a diagnostic so a renderer can point at the declaration.

use std::fmt;

/// Half-open byte range `start..end` within the owning file.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
