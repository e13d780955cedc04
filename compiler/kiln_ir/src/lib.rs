//! Kiln IR - Declaration Handles
//!
//! The trait compiler never looks inside the declaration model. It only needs
//! a few compact, hashable handles to key its tables:
//! - [`Span`] for anchoring diagnostics
//! - [`DeclId`] for stable declaration identity
//! - [`FileId`] for owning source files
//! - [`Marker`] for the attributes handlers inspect
//!
//! # Design Philosophy
//!
//! - **Handles, not nodes**: declarations are `DeclId(u32)`, files are `FileId(u32)`.
//!   The host owns the real syntax tree; the orchestrator owns only indices.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-stored handles.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod handle;
mod marker;
mod span;

pub use handle::{DeclId, FileId};
pub use marker::Marker;
pub use span::Span;

static_assert_size!(Span, 8);
static_assert_size!(DeclId, 4);
static_assert_size!(FileId, 4);
