//! Class records.
//!
//! A [`ClassRecord`] aggregates every trait matched against one declaration.
//! Records live in an arena owned by the orchestrator and are addressed by
//! [`RecordId`].

use kiln_diagnostic::Diagnostic;
use kiln_ir::{DeclId, FileId};

use crate::{HandlerPrecedence, Trait};

/// Index of a record in the orchestrator's arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct RecordId(u32);

impl RecordId {
    /// `None` once the arena outgrows the `u32` index space.
    #[inline]
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(RecordId)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// All traits matched against one declaration.
///
/// At most one trait comes from a primary handler. When a second primary
/// handler matches, the record keeps a single class-level diagnostic in
/// `meta_diagnostics` and no traits at all.
#[derive(Clone, Debug)]
pub struct ClassRecord {
    pub(crate) decl: DeclId,
    pub(crate) file: FileId,
    pub(crate) traits: Vec<Trait>,
    pub(crate) meta_diagnostics: Option<Vec<Diagnostic>>,
    pub(crate) has_primary_handler: bool,
    pub(crate) has_weak_handlers: bool,
}

impl ClassRecord {
    pub(crate) fn new(decl: DeclId, file: FileId) -> Self {
        ClassRecord {
            decl,
            file,
            traits: Vec::new(),
            meta_diagnostics: None,
            has_primary_handler: false,
            has_weak_handlers: false,
        }
    }

    pub fn decl(&self) -> DeclId {
        self.decl
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    /// Traits in handler match order.
    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    pub fn meta_diagnostics(&self) -> Option<&[Diagnostic]> {
        self.meta_diagnostics.as_deref()
    }

    pub fn has_primary_handler(&self) -> bool {
        self.has_primary_handler
    }

    pub fn has_weak_handlers(&self) -> bool {
        self.has_weak_handlers
    }

    /// Name of the primary handler currently holding the record.
    pub(crate) fn primary_handler_name(&self) -> Option<&str> {
        self.traits
            .iter()
            .find(|t| t.precedence() == HandlerPrecedence::Primary)
            .map(Trait::handler_name)
    }

    /// Whether every trait comes from a weak handler.
    pub(crate) fn holds_only_weak(&self) -> bool {
        self.has_weak_handlers
            && self
                .traits
                .iter()
                .all(|t| t.precedence() == HandlerPrecedence::Weak)
    }

    /// Whether any trait comes from a non-weak handler.
    pub(crate) fn holds_non_weak(&self) -> bool {
        self.traits
            .iter()
            .any(|t| t.precedence() != HandlerPrecedence::Weak)
    }

    pub(crate) fn push_trait(&mut self, t: Trait) {
        match t.precedence() {
            HandlerPrecedence::Primary => self.has_primary_handler = true,
            HandlerPrecedence::Weak => self.has_weak_handlers = true,
            HandlerPrecedence::Shared => {}
        }
        self.traits.push(t);
    }

    pub(crate) fn drop_weak_traits(&mut self) {
        self.traits.retain(|t| t.precedence() != HandlerPrecedence::Weak);
        self.has_weak_handlers = false;
    }

    /// Invalidate the whole class with a single diagnostic.
    pub(crate) fn poison(&mut self, diagnostic: Diagnostic) {
        self.meta_diagnostics = Some(vec![diagnostic]);
        self.traits.clear();
        self.has_primary_handler = false;
        self.has_weak_handlers = false;
    }
}
