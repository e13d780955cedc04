//! Compile phase: per declaration, on demand.

use rustc_hash::FxHashSet;

use kiln_ir::DeclId;

use super::{CompilerPhase, TraitCompiler};
use crate::{
    CompileResult, ConstantPool, DtsTransformRegistry, HandlerCapabilities, TraitCompilerError,
    TraitInput,
};

impl TraitCompiler {
    /// Compile one declaration.
    ///
    /// `decl` may be a transformed declaration; it is mapped back to the one
    /// its record was created for. Results are deduplicated by name, first
    /// trait wins. The declaration-file transform learns about every
    /// declaration with a record, even when nothing was produced, and about
    /// any type replacement a handler asks for.
    ///
    /// Returns `Ok(None)` when the declaration has no record or produced no
    /// results.
    #[tracing::instrument(level = "trace", skip_all, fields(decl = ?decl))]
    pub fn compile(
        &self,
        decl: DeclId,
        pool: &mut ConstantPool,
        dts: &mut dyn DtsTransformRegistry,
    ) -> Result<Option<Vec<CompileResult>>, TraitCompilerError> {
        self.expect_phase("compile", CompilerPhase::Resolved)?;

        let original = self.host.original_of(decl);
        let Some(record) = self.record_for(original) else {
            return Ok(None);
        };

        let mut results: Vec<CompileResult> = Vec::new();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        for t in record.traits() {
            if !t.is_resolved() {
                continue;
            }
            let Some(input) = t.input() else {
                continue;
            };
            let input = TraitInput { decl, ..input };
            let capabilities = t.handler().capabilities();

            if capabilities.contains(HandlerCapabilities::DECLARATION_TYPE) {
                if let Some(ty) = t.handler().declaration_type(input) {
                    dts.add_type_replacement(original, ty);
                }
            }
            if !capabilities.contains(HandlerCapabilities::COMPILE) {
                continue;
            }

            for result in t
                .handler()
                .compile(input, self.config.compilation_mode, pool)
            {
                if seen.insert(result.name.clone()) {
                    results.push(result);
                } else {
                    tracing::trace!(
                        name = %result.name,
                        handler = t.handler_name(),
                        "duplicate compile result dropped"
                    );
                }
            }
        }

        dts.add_fields(original, &results);
        Ok(if results.is_empty() {
            None
        } else {
            Some(results)
        })
    }
}
