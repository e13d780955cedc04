//! Scope dependency recording.
//!
//! Inside a compilation scope, names and selectors are resolved contextually:
//! an edit anywhere in the scope's transitive dependency set can change which
//! members apply to which declaration. The edges recorded here
//! over-approximate; a missed edge makes incremental builds unsound.
//!
//! For a scope with container file `M`, declaration file `F` and `D` the
//! current dependencies of `F`:
//!
//! ```text
//! F, D ──► M        container depends on the declaration, transitively
//! M    ──► F        declaration depends on its container
//! dir  ──► F        any directive member invalidates the declaration
//! D    ──► cmp      component members also see the declaration's deps
//! pipe ──► F        pipes invalidate the declaration, nothing more
//! ```

use kiln_ir::FileId;

use crate::{DeclarationHost, IncrementalStore, MemberRole, ScopeRegistry};

/// Record the dependency edges implied by every compilation scope.
///
/// Returns the number of scopes processed.
#[tracing::instrument(level = "debug", skip_all)]
pub fn record_scope_dependencies(
    host: &dyn DeclarationHost,
    scopes: &dyn ScopeRegistry,
    store: &mut dyn IncrementalStore,
) -> usize {
    let scopes = scopes.compilation_scopes();
    for scope in &scopes {
        let file = host.file_of(scope.declaration);
        let container_file = host.file_of(scope.container);
        let deps: Vec<FileId> = store.file_dependencies(file);

        store.track_file_dependency(file, container_file);
        store.track_file_dependencies(&deps, container_file);
        store.track_file_dependency(container_file, file);

        for member in &scope.members {
            let member_file = host.file_of(member.decl);
            match member.role {
                MemberRole::Directive { is_component } => {
                    store.track_file_dependency(member_file, file);
                    if is_component {
                        store.track_file_dependencies(&deps, member_file);
                    }
                }
                MemberRole::Pipe => store.track_file_dependency(member_file, file),
            }
        }

        tracing::trace!(
            container = ?scope.container,
            declaration = ?scope.declaration,
            members = scope.members.len(),
            deps = deps.len(),
            "recorded scope dependencies"
        );
    }
    tracing::debug!(scopes = scopes.len(), "scope dependencies recorded");
    scopes.len()
}
