//! Incremental rebuilds: discarding and adopting whole files.
//!
//! Reuse is per file, never per declaration: a changed file is forgotten and
//! re-analyzed from scratch, an unchanged file is adopted from the prior
//! compilation.

use kiln_ir::FileId;

use super::analysis::analyze_trait;
use super::{CompilerPhase, TraitCompiler};
use crate::{ClassRecord, HandlerCapabilities, Trait, TraitCompilerError, TraitState};

impl TraitCompiler {
    /// Drop every record of `file` so it can be analyzed again.
    pub fn forget_file(&mut self, file: FileId) -> Result<(), TraitCompilerError> {
        self.expect_phase("forget_file", CompilerPhase::Analysis)?;

        let mut dropped = 0_usize;
        for decl in self.by_file.remove(&file).unwrap_or_default() {
            if let Some(id) = self.by_decl.remove(&decl) {
                self.records[id.index()] = None;
                dropped += 1;
            }
        }
        self.analyzed_files.remove(&file);
        if let Some(names) = self.symbols.get_mut(&file) {
            names.clear();
        }
        tracing::debug!(?file, dropped, "forgot file records");
        Ok(())
    }

    /// Rebuild the records of an unchanged `file` from a prior compilation.
    ///
    /// Traits are re-associated with this compiler's handlers by name.
    /// Analyses are reused; resolution always runs again:
    /// - analyzed, resolved, or errored-in-resolve → `Analyzed`
    /// - skipped → `Skipped`
    /// - errored-in-analysis → `Errored` with the same diagnostics
    /// - still pending → analyzed now
    #[tracing::instrument(level = "debug", skip_all, fields(file = ?file))]
    pub fn adopt_file(
        &mut self,
        prior: &TraitCompiler,
        file: FileId,
    ) -> Result<(), TraitCompilerError> {
        self.expect_phase("adopt_file", CompilerPhase::Analysis)?;
        self.forget_file(file)?;
        self.analyzed_files.insert(file);

        for prior_record in prior.records_for(file) {
            let decl = prior_record.decl();
            let mut record = ClassRecord::new(decl, file);
            record.meta_diagnostics = prior_record.meta_diagnostics.clone();

            let mut symbols = Vec::new();
            for prior_trait in prior_record.traits() {
                let handler = self
                    .registry
                    .get(prior_trait.handler_name())
                    .cloned()
                    .ok_or_else(|| {
                        TraitCompilerError::UnknownHandler(prior_trait.handler_name().to_string())
                    })?;
                let mut t = Trait::pending(handler, decl, prior_trait.detected().clone());

                match (prior_trait.state(), prior_trait.analysis()) {
                    (
                        TraitState::Analyzed | TraitState::Resolved | TraitState::Errored,
                        Some(analysis),
                    ) => {
                        if t
                            .handler()
                            .capabilities()
                            .contains(HandlerCapabilities::REGISTER)
                        {
                            t.handler().register(decl, analysis);
                        }
                        let symbol = prior_trait.symbol_name().map(str::to_string);
                        t.mark_analyzed(analysis.clone(), symbol.clone())?;
                        symbols.push(symbol);
                    }
                    (TraitState::Skipped, _) => t.mark_skipped()?,
                    (TraitState::Errored, None) => {
                        t.mark_errored(prior_trait.diagnostics().to_vec())?;
                    }
                    _ => symbols.push(analyze_trait(&mut t)?),
                }
                record.push_trait(t);
            }

            self.insert_record(record)?;
            for symbol in symbols {
                self.record_symbol(file, symbol);
            }
        }
        Ok(())
    }
}
