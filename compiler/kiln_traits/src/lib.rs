//! Kiln Trait Compiler - Multi-Phase Orchestration of Marker Handlers
//!
//! Drives every declaration that carries a recognized marker through an
//! ordered pipeline of pluggable [`DecoratorHandler`]s:
//!
//! ```text
//! analyze(file)  ──► detect + analyze     (per file, any order of files)
//!     │
//!     ▼
//! resolve()      ──► resolve + record dependency edges   (exactly once)
//!     │
//!     ▼
//! type_check() / index() / extended_check()               (any number of times)
//!     │
//!     ▼
//! compile(decl)  ──► deduplicated results + declaration-file fields
//! ```
//!
//! Each (handler, declaration) pairing is a [`Trait`] with its own state
//! machine; all traits matched against one declaration form a
//! [`ClassRecord`]. The orchestrator owns the records, the per-file index and
//! the re-export table. Everything else (the declaration model, the scope
//! registry, the incremental store, the declaration-file transforms) is a
//! collaborator passed in through a trait.
//!
//! # Error Model
//!
//! - **Diagnostics** are recoverable: they land on a trait (`Errored`) or on
//!   the whole class (`meta_diagnostics`) and surface through
//!   [`TraitCompiler::diagnostics`].
//! - **[`TraitCompilerError`]** is fatal: phase-order violations, invalid
//!   transitions and non-diagnostic handler failures abort the pass.
//!
//! # Debugging
//!
//! - `RUST_LOG=kiln_traits=debug`: phase entry/exit and per-record decisions.
//! - `RUST_LOG=kiln_traits=trace`: every trait transition.

mod compiler;
mod config;
mod deps;
mod dts;
mod error;
mod handler;
mod host;
mod incremental;
mod lifecycle;
mod payload;
mod pool;
mod record;
mod registry;

pub use compiler::{CompilerPhase, ReexportTarget, TraitCompiler};
pub use config::{CompilationMode, TraitCompilerConfig};
pub use deps::record_scope_dependencies;
pub use dts::{DeclarationField, DtsTransformRegistry, DtsTransforms};
pub use error::{HandlerError, TraitCompilerError};
pub use handler::{
    AnalysisOutput, CompileResult, DecoratorHandler, DetectResult, HandlerCapabilities,
    HandlerPrecedence, IndexingContext, PreanalysisTask, Reexport, ResolveOutput,
    TraitInput, TypeCheckContext,
};
pub use host::{CompilationScope, DeclarationHost, MemberRole, ScopeMember, ScopeRegistry};
pub use incremental::{FileDependencyGraph, IncrementalStore};
pub use lifecycle::{Trait, TraitState};
pub use payload::Payload;
pub use pool::ConstantPool;
pub use record::{ClassRecord, RecordId};
pub use registry::HandlerRegistry;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=kiln_traits=debug` or `RUST_LOG=kiln_traits=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
