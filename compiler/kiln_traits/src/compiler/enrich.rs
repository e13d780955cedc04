//! Enrichment passes over resolved traits.

use kiln_diagnostic::Diagnostic;
use kiln_ir::DeclId;

use super::{CompilerPhase, TraitCompiler};
use crate::{
    HandlerCapabilities, IndexingContext, Trait, TraitCompilerError, TraitInput, TraitState,
    TypeCheckContext,
};

impl TraitCompiler {
    /// Resolved traits whose handler has `capability`, in discovery order.
    fn resolved_with(
        &self,
        capability: HandlerCapabilities,
    ) -> impl Iterator<Item = (&Trait, TraitInput<'_>)> {
        self.records()
            .flat_map(|record| record.traits().iter())
            .filter(move |t| t.is_resolved() && t.handler().capabilities().contains(capability))
            .filter_map(|t| t.input().map(|input| (t, input)))
    }

    /// Feed every resolved trait into a type-check context.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn type_check(&self, ctx: &mut dyn TypeCheckContext) -> Result<(), TraitCompilerError> {
        self.expect_phase("type_check", CompilerPhase::Resolved)?;
        for (t, input) in self.resolved_with(HandlerCapabilities::TYPE_CHECK) {
            t.handler().type_check(ctx, input);
        }
        Ok(())
    }

    /// Feed every resolved trait into an indexing context.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn index(&self, ctx: &mut dyn IndexingContext) -> Result<(), TraitCompilerError> {
        self.expect_phase("index", CompilerPhase::Resolved)?;
        for (t, input) in self.resolved_with(HandlerCapabilities::INDEX) {
            t.handler().index(ctx, input);
        }
        Ok(())
    }

    /// Run handler-specific extra checks and collect what they report.
    ///
    /// The diagnostics are returned, not stored: the checks may run many
    /// times and must not accumulate.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn extended_check(&self) -> Result<Vec<Diagnostic>, TraitCompilerError> {
        self.expect_phase("extended_check", CompilerPhase::Resolved)?;
        let mut diagnostics = Vec::new();
        for (t, input) in self.resolved_with(HandlerCapabilities::EXTENDED_CHECK) {
            diagnostics.extend(t.handler().extended_check(input));
        }
        Ok(diagnostics)
    }

    /// Let handlers refresh external resources (templates, styles) of one
    /// declaration. Only analyzed or resolved traits take part.
    pub fn update_resources(&self, decl: DeclId) {
        let Some(record) = self.record_for(self.host.original_of(decl)) else {
            return;
        };
        for t in record.traits() {
            if !matches!(t.state(), TraitState::Analyzed | TraitState::Resolved)
                || !t
                    .handler()
                    .capabilities()
                    .contains(HandlerCapabilities::UPDATE_RESOURCES)
            {
                continue;
            }
            if let Some(analysis) = t.analysis() {
                t.handler().update_resources(decl, analysis);
            }
        }
    }
}
