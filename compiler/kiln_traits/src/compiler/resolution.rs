//! Resolution phase: one global pass, then dependency recording.

use super::{CompilerPhase, ReexportTarget, TraitCompiler};
use crate::{
    record_scope_dependencies, HandlerCapabilities, HandlerError, IncrementalStore,
    ResolveOutput, ScopeRegistry, TraitCompilerError, TraitState,
};

impl TraitCompiler {
    /// Resolve every analyzed trait, merge re-export requests, and record
    /// scope dependency edges. Slots freed by `forget_file` are reclaimed
    /// first.
    ///
    /// Must run exactly once, after every file has been analyzed. A second
    /// call, or a trait still `Pending`, is an internal error.
    #[tracing::instrument(level = "debug", skip_all, fields(records = self.by_decl.len()))]
    pub fn resolve(
        &mut self,
        scopes: &dyn ScopeRegistry,
        store: &mut dyn IncrementalStore,
    ) -> Result<(), TraitCompilerError> {
        self.expect_phase("resolve", CompilerPhase::Analysis)?;
        self.phase = CompilerPhase::Resolved;
        self.compact_records();

        let mut resolved = 0_usize;
        let mut errored = 0_usize;
        for record in self.records.iter_mut().flatten() {
            let file = record.file;
            for t in &mut record.traits {
                match t.state() {
                    TraitState::Skipped | TraitState::Errored => continue,
                    TraitState::Pending | TraitState::Resolved => {
                        return Err(TraitCompilerError::InvalidTransition {
                            handler: t.handler_name().to_string(),
                            decl: t.decl(),
                            from: t.state(),
                            to: TraitState::Resolved,
                        });
                    }
                    TraitState::Analyzed => {}
                }

                if !t
                    .handler()
                    .capabilities()
                    .contains(HandlerCapabilities::RESOLVE)
                {
                    t.mark_resolved(None)?;
                    resolved += 1;
                    continue;
                }

                let decl = t.decl();
                let result = match t.analysis() {
                    Some(analysis) => t.handler().resolve(decl, analysis),
                    None => Ok(ResolveOutput::default()),
                };
                let output = match result {
                    Ok(output) => output,
                    Err(HandlerError::Diagnostics(diagnostics)) => {
                        t.mark_errored(diagnostics)?;
                        errored += 1;
                        continue;
                    }
                    Err(err @ HandlerError::Internal(_)) => {
                        return Err(TraitCompilerError::handler_failed(
                            t.handler_name(),
                            decl,
                            "resolve",
                            &err,
                        ));
                    }
                };

                if !output.diagnostics.is_empty() {
                    t.mark_errored(output.diagnostics)?;
                    errored += 1;
                    continue;
                }

                if !output.reexports.is_empty() {
                    let table = self.reexports.entry(file).or_default();
                    for reexport in output.reexports {
                        table.insert(
                            reexport.alias,
                            ReexportTarget {
                                from_module: reexport.from_module,
                                symbol_name: reexport.symbol_name,
                            },
                        );
                    }
                }
                t.mark_resolved(output.resolution)?;
                resolved += 1;
            }
        }
        tracing::debug!(resolved, errored, "resolution complete");

        record_scope_dependencies(self.host.as_ref(), scopes, store);
        Ok(())
    }
}
