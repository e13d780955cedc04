//! The handler contract.
//!
//! A handler recognizes one category of marker and owns everything that
//! happens to a matching declaration: analysis, resolution, enrichment and
//! code generation. The orchestrator only decides *whether* and *when* each
//! step runs.
//!
//! # Capabilities
//!
//! `detect` and `analyze` are mandatory. Every other step is optional and is
//! declared through [`HandlerCapabilities`]. Phase drivers consult the set
//! instead of relying on the default method bodies, so "capability absent"
//! is observable (e.g. a handler without `RESOLVE` goes straight to
//! `Resolved` with no resolution payload).

use bitflags::bitflags;
use kiln_diagnostic::Diagnostic;
use kiln_ir::{DeclId, Marker};

use crate::{CompilationMode, ConstantPool, HandlerError, Payload};

/// Priority class governing which traits may coexist on one declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum HandlerPrecedence {
    /// At most one primary trait per declaration. A second one is a
    /// collision that invalidates the whole class.
    Primary,
    /// Coexists with anything.
    #[default]
    Shared,
    /// Only applies when nothing stronger matched.
    Weak,
}

bitflags! {
    /// Optional steps a handler implements.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct HandlerCapabilities: u16 {
        /// Deferred work that must settle before `analyze` (async sweeps only).
        const PREANALYZE = 1 << 0;
        /// Notified after a successful analysis.
        const REGISTER = 1 << 1;
        const RESOLVE = 1 << 2;
        const TYPE_CHECK = 1 << 3;
        const INDEX = 1 << 4;
        const EXTENDED_CHECK = 1 << 5;
        const UPDATE_RESOURCES = 1 << 6;
        const COMPILE = 1 << 7;
        /// Replaces the declaration's type in declaration files.
        const DECLARATION_TYPE = 1 << 8;
    }
}

/// Result of a successful `detect`.
#[derive(Clone, Debug)]
pub struct DetectResult {
    /// The marker that triggered the match, if any. Returned by
    /// `decorators_for` once the trait is resolved so it can be stripped.
    pub trigger: Option<Marker>,
    /// Handler-private metadata carried into analysis.
    pub metadata: Payload,
}

impl DetectResult {
    pub fn new(trigger: Option<Marker>, metadata: Payload) -> Self {
        DetectResult { trigger, metadata }
    }
}

/// Output of `analyze`.
///
/// - analysis present, no diagnostics: the trait becomes `Analyzed`
/// - diagnostics present: the trait becomes `Errored`
/// - neither: the trait becomes `Skipped`
#[derive(Clone, Debug, Default)]
pub struct AnalysisOutput {
    pub analysis: Option<Payload>,
    pub diagnostics: Vec<Diagnostic>,
    /// Name of a symbol the handler will generate for this declaration.
    pub symbol_name: Option<String>,
}

impl AnalysisOutput {
    pub fn analyzed(analysis: Payload) -> Self {
        AnalysisOutput {
            analysis: Some(analysis),
            ..Self::default()
        }
    }

    pub fn skipped() -> Self {
        Self::default()
    }

    pub fn errored(diagnostics: Vec<Diagnostic>) -> Self {
        AnalysisOutput {
            diagnostics,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_symbol_name(mut self, name: impl Into<String>) -> Self {
        self.symbol_name = Some(name.into());
        self
    }
}

/// A request to re-export a symbol from the declaration's file.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Reexport {
    /// Local alias the symbol is exported under.
    pub alias: String,
    /// Module specifier the symbol comes from.
    pub from_module: String,
    /// Name of the symbol in that module.
    pub symbol_name: String,
}

impl Reexport {
    pub fn new(
        alias: impl Into<String>,
        from_module: impl Into<String>,
        symbol_name: impl Into<String>,
    ) -> Self {
        Reexport {
            alias: alias.into(),
            from_module: from_module.into(),
            symbol_name: symbol_name.into(),
        }
    }
}

/// Output of `resolve`. Diagnostics make the trait `Errored`.
#[derive(Clone, Debug, Default)]
pub struct ResolveOutput {
    pub resolution: Option<Payload>,
    pub diagnostics: Vec<Diagnostic>,
    pub reexports: Vec<Reexport>,
}

impl ResolveOutput {
    pub fn resolved(resolution: Payload) -> Self {
        ResolveOutput {
            resolution: Some(resolution),
            ..Self::default()
        }
    }

    pub fn errored(diagnostics: Vec<Diagnostic>) -> Self {
        ResolveOutput {
            diagnostics,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_reexport(mut self, reexport: Reexport) -> Self {
        self.reexports.push(reexport);
        self
    }
}

/// What post-resolution steps see of a resolved trait.
#[derive(Copy, Clone, Debug)]
pub struct TraitInput<'a> {
    pub decl: DeclId,
    pub analysis: &'a Payload,
    pub resolution: Option<&'a Payload>,
}

/// One compiled field for a declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CompileResult {
    /// Field name; unique per declaration after deduplication.
    pub name: String,
    /// Emitted initializer expression, if the field has one.
    pub initializer: Option<String>,
    /// Statements emitted alongside the field.
    pub statements: Vec<String>,
    /// Declared type of the field, for declaration files.
    pub ty: String,
}

impl CompileResult {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        CompileResult {
            name: name.into(),
            initializer: None,
            statements: Vec::new(),
            ty: ty.into(),
        }
    }

    #[must_use]
    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }

    #[must_use]
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }
}

/// Deferred preanalysis work. Runs off the orchestrator's thread and is
/// joined before the file's analysis proceeds.
pub type PreanalysisTask = Box<dyn FnOnce() -> Result<(), HandlerError> + Send>;

/// Accumulator filled by the `type_check` enrichment pass.
pub trait TypeCheckContext {
    fn add_check(&mut self, decl: DeclId, unit: Payload);
}

/// Accumulator filled by the `index` enrichment pass.
pub trait IndexingContext {
    fn add_entry(&mut self, decl: DeclId, entry: Payload);
}

/// A pluggable marker handler.
///
/// Optional methods have no-op defaults, but they are only ever invoked when
/// the matching bit is set in [`capabilities`](Self::capabilities).
pub trait DecoratorHandler {
    /// Unique name within a registry; used to re-associate adopted traits.
    fn name(&self) -> &str;

    fn precedence(&self) -> HandlerPrecedence;

    fn capabilities(&self) -> HandlerCapabilities {
        HandlerCapabilities::empty()
    }

    /// Decide whether this handler applies to the declaration.
    fn detect(&self, decl: DeclId, markers: &[Marker]) -> Option<DetectResult>;

    fn preanalyze(&self, _decl: DeclId, _metadata: &Payload) -> Option<PreanalysisTask> {
        None
    }

    fn analyze(&self, decl: DeclId, metadata: &Payload) -> Result<AnalysisOutput, HandlerError>;

    fn register(&self, _decl: DeclId, _analysis: &Payload) {}

    fn resolve(&self, _decl: DeclId, _analysis: &Payload) -> Result<ResolveOutput, HandlerError> {
        Ok(ResolveOutput::default())
    }

    fn type_check(&self, _ctx: &mut dyn TypeCheckContext, _input: TraitInput<'_>) {}

    fn index(&self, _ctx: &mut dyn IndexingContext, _input: TraitInput<'_>) {}

    fn extended_check(&self, _input: TraitInput<'_>) -> Vec<Diagnostic> {
        Vec::new()
    }

    fn update_resources(&self, _decl: DeclId, _analysis: &Payload) {}

    /// New declared type for the declaration, applied at compile time.
    fn declaration_type(&self, _input: TraitInput<'_>) -> Option<String> {
        None
    }

    /// Produce one or several fields for the declaration.
    fn compile(
        &self,
        _input: TraitInput<'_>,
        _mode: CompilationMode,
        _pool: &mut ConstantPool,
    ) -> Vec<CompileResult> {
        Vec::new()
    }
}
