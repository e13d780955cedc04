//! Trait lifecycle.
//!
//! A [`Trait`] is one handler matched against one declaration. Its state only
//! moves forward:
//!
//! ```text
//!            ┌──► Skipped
//!            │
//! Pending ───┼──► Errored
//!            │       ▲
//!            └──► Analyzed ───► Resolved
//! ```
//!
//! Transitions mutate the stored trait in place. A transition that does not
//! follow the diagram is an internal error, never a diagnostic: it means a
//! phase ran out of order.

use std::fmt;
use std::sync::Arc;

use kiln_diagnostic::Diagnostic;
use kiln_ir::DeclId;

use crate::{
    DecoratorHandler, DetectResult, HandlerPrecedence, Payload, TraitCompilerError, TraitInput,
};

/// Lifecycle state of a trait.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TraitState {
    /// Matched, not yet analyzed.
    Pending,
    /// Analysis produced a payload.
    Analyzed,
    /// Analysis produced nothing. Terminal.
    Skipped,
    /// Analysis or resolution reported diagnostics. Terminal.
    Errored,
    /// Ready for enrichment and compilation.
    Resolved,
}

impl fmt::Display for TraitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitState::Pending => write!(f, "pending"),
            TraitState::Analyzed => write!(f, "analyzed"),
            TraitState::Skipped => write!(f, "skipped"),
            TraitState::Errored => write!(f, "errored"),
            TraitState::Resolved => write!(f, "resolved"),
        }
    }
}

/// One (handler, declaration) pairing.
#[derive(Clone)]
pub struct Trait {
    handler: Arc<dyn DecoratorHandler>,
    decl: DeclId,
    detected: DetectResult,
    state: TraitState,
    analysis: Option<Payload>,
    resolution: Option<Payload>,
    diagnostics: Vec<Diagnostic>,
    symbol_name: Option<String>,
}

impl Trait {
    pub(crate) fn pending(
        handler: Arc<dyn DecoratorHandler>,
        decl: DeclId,
        detected: DetectResult,
    ) -> Self {
        Trait {
            handler,
            decl,
            detected,
            state: TraitState::Pending,
            analysis: None,
            resolution: None,
            diagnostics: Vec::new(),
            symbol_name: None,
        }
    }

    pub fn handler(&self) -> &dyn DecoratorHandler {
        self.handler.as_ref()
    }

    pub fn handler_name(&self) -> &str {
        self.handler.name()
    }

    pub fn precedence(&self) -> HandlerPrecedence {
        self.handler.precedence()
    }

    pub fn decl(&self) -> DeclId {
        self.decl
    }

    pub fn state(&self) -> TraitState {
        self.state
    }

    pub fn detected(&self) -> &DetectResult {
        &self.detected
    }

    /// Present once the trait has been analyzed. Kept when resolution errors.
    pub fn analysis(&self) -> Option<&Payload> {
        self.analysis.as_ref()
    }

    /// Present once resolved, unless the handler has no resolve step.
    pub fn resolution(&self) -> Option<&Payload> {
        self.resolution.as_ref()
    }

    /// Non-empty only when `Errored`.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Generated-symbol hint from analysis.
    pub fn symbol_name(&self) -> Option<&str> {
        self.symbol_name.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.state == TraitState::Resolved
    }

    /// View handed to post-resolution steps. `None` without an analysis.
    pub(crate) fn input(&self) -> Option<TraitInput<'_>> {
        self.analysis.as_ref().map(|analysis| TraitInput {
            decl: self.decl,
            analysis,
            resolution: self.resolution.as_ref(),
        })
    }

    fn transition(
        &mut self,
        allowed: &[TraitState],
        to: TraitState,
    ) -> Result<(), TraitCompilerError> {
        if !allowed.contains(&self.state) {
            return Err(TraitCompilerError::InvalidTransition {
                handler: self.handler.name().to_string(),
                decl: self.decl,
                from: self.state,
                to,
            });
        }
        tracing::trace!(
            handler = self.handler.name(),
            decl = ?self.decl,
            from = %self.state,
            %to,
            "trait transition"
        );
        self.state = to;
        Ok(())
    }

    pub(crate) fn mark_analyzed(
        &mut self,
        analysis: Payload,
        symbol_name: Option<String>,
    ) -> Result<(), TraitCompilerError> {
        self.transition(&[TraitState::Pending], TraitState::Analyzed)?;
        self.analysis = Some(analysis);
        self.symbol_name = symbol_name;
        Ok(())
    }

    pub(crate) fn mark_skipped(&mut self) -> Result<(), TraitCompilerError> {
        self.transition(&[TraitState::Pending], TraitState::Skipped)
    }

    pub(crate) fn mark_errored(
        &mut self,
        diagnostics: Vec<Diagnostic>,
    ) -> Result<(), TraitCompilerError> {
        self.transition(
            &[TraitState::Pending, TraitState::Analyzed],
            TraitState::Errored,
        )?;
        self.diagnostics = diagnostics;
        Ok(())
    }

    pub(crate) fn mark_resolved(
        &mut self,
        resolution: Option<Payload>,
    ) -> Result<(), TraitCompilerError> {
        self.transition(&[TraitState::Analyzed], TraitState::Resolved)?;
        self.resolution = resolution;
        Ok(())
    }
}

impl fmt::Debug for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trait")
            .field("handler", &self.handler.name())
            .field("decl", &self.decl)
            .field("state", &self.state)
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}
