//! Collaborator interfaces for the declaration model and compilation scopes.

use kiln_ir::{DeclId, FileId, Marker, Span};

/// What the orchestrator needs to know about declarations.
///
/// The host owns the syntax tree and the semantic model; the orchestrator
/// only ever asks these questions.
pub trait DeclarationHost {
    /// Markers attached to the declaration, in source order.
    fn markers(&self, decl: DeclId) -> &[Marker];

    /// File that owns the declaration.
    fn file_of(&self, decl: DeclId) -> FileId;

    /// Map a transformed declaration back to the one it was recorded under.
    fn original_of(&self, decl: DeclId) -> DeclId {
        decl
    }

    fn is_exported(&self, _decl: DeclId) -> bool {
        true
    }

    /// Class declarations of a file, in program order.
    fn declarations_in(&self, file: FileId) -> Vec<DeclId>;

    /// Whether the file only declares shapes (nothing to compile).
    fn is_declaration_file(&self, _file: FileId) -> bool {
        false
    }

    /// Span diagnostics about the whole declaration are anchored at.
    fn span_of(&self, decl: DeclId) -> Span;

    fn name_of(&self, decl: DeclId) -> &str;
}

/// How a member entered a compilation scope.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberRole {
    /// Matched by selector. Components additionally pick up the
    /// declaration's dependencies.
    Directive { is_component: bool },
    /// Matched by name.
    Pipe,
}

/// A declaration visible inside a compilation scope.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeMember {
    pub decl: DeclId,
    pub role: MemberRole,
}

impl ScopeMember {
    pub fn directive(decl: DeclId) -> Self {
        ScopeMember {
            decl,
            role: MemberRole::Directive {
                is_component: false,
            },
        }
    }

    pub fn component(decl: DeclId) -> Self {
        ScopeMember {
            decl,
            role: MemberRole::Directive { is_component: true },
        }
    }

    pub fn pipe(decl: DeclId) -> Self {
        ScopeMember {
            decl,
            role: MemberRole::Pipe,
        }
    }
}

/// A container plus the members currently resolvable for one declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CompilationScope {
    /// The declaration aggregating the scope (e.g. a module).
    pub container: DeclId,
    /// The declaration compiled within the scope.
    pub declaration: DeclId,
    pub members: Vec<ScopeMember>,
}

/// Source of compilation scopes, consulted once after resolution.
pub trait ScopeRegistry {
    fn compilation_scopes(&self) -> Vec<CompilationScope>;
}
