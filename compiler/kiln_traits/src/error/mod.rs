//! Error types for trait compilation.
//!
//! Two classes of failure flow through the orchestrator:
//!
//! - [`HandlerError::Diagnostics`] is the structured, expected failure a
//!   handler raises when a declaration is wrong. The orchestrator catches it
//!   and parks the diagnostics on the offending trait.
//! - Everything else becomes a [`TraitCompilerError`] and aborts the pass.

use kiln_diagnostic::Diagnostic;
use kiln_ir::{DeclId, FileId};
use thiserror::Error;

use crate::{CompilerPhase, TraitState};

/// Failure returned by a handler capability.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Structured, recoverable failure. The trait ends `Errored`.
    #[error("{} diagnostic(s) reported", .0.len())]
    Diagnostics(Vec<Diagnostic>),
    /// Anything the handler did not expect. Aborts the whole pass.
    #[error("{0}")]
    Internal(String),
}

impl From<Diagnostic> for HandlerError {
    fn from(diagnostic: Diagnostic) -> Self {
        HandlerError::Diagnostics(vec![diagnostic])
    }
}

/// Internal error: the orchestrator or a handler violated the phase contract.
///
/// None of these are user-facing conditions. They indicate a defect in the
/// driver calling the orchestrator, in the orchestrator itself, or in a
/// misbehaving handler.
#[derive(Debug, Error)]
pub enum TraitCompilerError {
    #[error("`{operation}` is not allowed in the {phase} phase (requires {expected})")]
    PhaseOrder {
        operation: &'static str,
        phase: CompilerPhase,
        expected: CompilerPhase,
    },

    #[error("trait `{handler}` on {decl:?} cannot move from {from} to {to}")]
    InvalidTransition {
        handler: String,
        decl: DeclId,
        from: TraitState,
        to: TraitState,
    },

    #[error("record arena exceeds the u32 index space")]
    RecordLimit,

    #[error("handler `{0}` is registered more than once")]
    DuplicateHandler(String),

    #[error("no handler named `{0}` is registered")]
    UnknownHandler(String),

    #[error("handler `{handler}` failed during {phase} of {decl:?}: {message}")]
    HandlerFailed {
        handler: String,
        decl: DeclId,
        phase: &'static str,
        message: String,
    },

    #[error("preanalysis of {file:?} failed in handler `{handler}`: {message}")]
    Preanalysis {
        file: FileId,
        handler: String,
        message: String,
    },
}

impl TraitCompilerError {
    /// Wrap a handler failure that is not allowed to become a diagnostic.
    pub(crate) fn handler_failed(
        handler: &str,
        decl: DeclId,
        phase: &'static str,
        error: &HandlerError,
    ) -> Self {
        TraitCompilerError::HandlerFailed {
            handler: handler.to_string(),
            decl,
            phase,
            message: error.to_string(),
        }
    }
}
