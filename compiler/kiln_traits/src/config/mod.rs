//! Orchestrator configuration.

/// How compiled output is expected to be consumed.
///
/// The orchestrator does not interpret the mode; it forwards it to every
/// handler `compile` call so handlers can pick the matching emission.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum CompilationMode {
    /// Full compilation with all metadata available.
    #[default]
    Full,
    /// Partial compilation producing output that is linked later.
    Partial,
    /// Single-file compilation without cross-file information.
    Local,
}

/// Configuration for a [`TraitCompiler`](crate::TraitCompiler).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TraitCompilerConfig {
    /// Mode forwarded to handlers at compile time.
    pub compilation_mode: CompilationMode,
    /// Whether declarations that are not exported are still matched.
    pub compile_non_exported: bool,
    /// Skip files the host reports as declaration-only (no bodies to compile).
    pub skip_declaration_files: bool,
}

impl Default for TraitCompilerConfig {
    fn default() -> Self {
        TraitCompilerConfig {
            compilation_mode: CompilationMode::Full,
            compile_non_exported: true,
            skip_declaration_files: true,
        }
    }
}

impl TraitCompilerConfig {
    /// Only exported declarations are eligible for matching.
    pub fn exported_only() -> Self {
        TraitCompilerConfig {
            compile_non_exported: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_compilation_mode(mut self, mode: CompilationMode) -> Self {
        self.compilation_mode = mode;
        self
    }

    #[must_use]
    pub fn with_compile_non_exported(mut self, enabled: bool) -> Self {
        self.compile_non_exported = enabled;
        self
    }

    #[must_use]
    pub fn with_skip_declaration_files(mut self, enabled: bool) -> Self {
        self.skip_declaration_files = enabled;
        self
    }
}
