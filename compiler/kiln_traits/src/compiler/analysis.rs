//! Analysis phase: detect + analyze, one file at a time.

use rayon::prelude::*;

use kiln_ir::FileId;

use super::{CompilerPhase, TraitCompiler};
use crate::{
    HandlerCapabilities, HandlerError, PreanalysisTask, RecordId, Trait, TraitCompilerError,
    TraitState,
};

impl TraitCompiler {
    /// Match and analyze every declaration of `file`, synchronously.
    ///
    /// Structured handler diagnostics park on the trait; any other handler
    /// failure aborts the pass. Analyzing the same file twice is a no-op.
    #[tracing::instrument(level = "debug", skip_all, fields(file = ?file))]
    pub fn analyze(&mut self, file: FileId) -> Result<(), TraitCompilerError> {
        self.expect_phase("analyze", CompilerPhase::Analysis)?;
        if !self.begin_file(file) {
            return Ok(());
        }

        for decl in self.host.declarations_in(file) {
            if let Some(id) = self.scan_class(decl)? {
                self.analyze_record(id)?;
            }
        }
        Ok(())
    }

    /// Like [`analyze`](Self::analyze), but first runs every handler's
    /// deferred preanalysis for the file and waits for all of it to settle.
    ///
    /// The join is all-or-nothing: the first failed task (in discovery
    /// order) aborts the pass and no trait of the file is analyzed.
    #[tracing::instrument(level = "debug", skip_all, fields(file = ?file))]
    pub fn analyze_async(&mut self, file: FileId) -> Result<(), TraitCompilerError> {
        self.expect_phase("analyze_async", CompilerPhase::Analysis)?;
        if !self.begin_file(file) {
            return Ok(());
        }

        let mut ids = Vec::new();
        let mut tasks: Vec<(String, PreanalysisTask)> = Vec::new();
        for decl in self.host.declarations_in(file) {
            let Some(id) = self.scan_class(decl)? else {
                continue;
            };
            if let Some(record) = self.records[id.index()].as_ref() {
                for t in record.traits() {
                    if !t
                        .handler()
                        .capabilities()
                        .contains(HandlerCapabilities::PREANALYZE)
                    {
                        continue;
                    }
                    if let Some(task) = t.handler().preanalyze(decl, &t.detected().metadata) {
                        tasks.push((t.handler_name().to_string(), task));
                    }
                }
            }
            ids.push(id);
        }

        join_preanalysis(file, tasks)?;

        for id in ids {
            self.analyze_record(id)?;
        }
        Ok(())
    }

    /// Gate a file into the analysis sweep.
    fn begin_file(&mut self, file: FileId) -> bool {
        if self.config.skip_declaration_files && self.host.is_declaration_file(file) {
            tracing::debug!("skipping declaration file");
            return false;
        }
        if !self.analyzed_files.insert(file) {
            tracing::debug!("file already analyzed");
            return false;
        }
        true
    }

    fn analyze_record(&mut self, id: RecordId) -> Result<(), TraitCompilerError> {
        let Some(record) = self.record_mut(id) else {
            return Ok(());
        };
        let file = record.file;
        let mut symbols = Vec::new();
        for t in &mut record.traits {
            symbols.push(analyze_trait(t)?);
        }
        for name in symbols {
            self.record_symbol(file, name);
        }
        Ok(())
    }
}

/// Analyze one pending trait in place.
///
/// Returns the generated-symbol hint of a successful analysis.
pub(super) fn analyze_trait(t: &mut Trait) -> Result<Option<String>, TraitCompilerError> {
    if t.state() != TraitState::Pending {
        return Err(TraitCompilerError::InvalidTransition {
            handler: t.handler_name().to_string(),
            decl: t.decl(),
            from: t.state(),
            to: TraitState::Analyzed,
        });
    }

    let decl = t.decl();
    let result = t.handler().analyze(decl, &t.detected().metadata);
    let output = match result {
        Ok(output) => output,
        Err(HandlerError::Diagnostics(diagnostics)) => {
            t.mark_errored(diagnostics)?;
            return Ok(None);
        }
        Err(err @ HandlerError::Internal(_)) => {
            return Err(TraitCompilerError::handler_failed(
                t.handler_name(),
                decl,
                "analyze",
                &err,
            ));
        }
    };

    if !output.diagnostics.is_empty() {
        t.mark_errored(output.diagnostics)?;
        return Ok(None);
    }
    let Some(analysis) = output.analysis else {
        t.mark_skipped()?;
        return Ok(None);
    };

    if t
        .handler()
        .capabilities()
        .contains(HandlerCapabilities::REGISTER)
    {
        t.handler().register(decl, &analysis);
    }
    t.mark_analyzed(analysis, output.symbol_name.clone())?;
    Ok(output.symbol_name)
}

/// Run every preanalysis task of a file and wait for all of them.
fn join_preanalysis(
    file: FileId,
    tasks: Vec<(String, PreanalysisTask)>,
) -> Result<(), TraitCompilerError> {
    if tasks.is_empty() {
        return Ok(());
    }
    tracing::debug!(count = tasks.len(), "joining preanalysis tasks");

    let outcomes: Vec<(String, Result<(), HandlerError>)> = tasks
        .into_par_iter()
        .map(|(handler, task)| (handler, task()))
        .collect();

    for (handler, outcome) in outcomes {
        if let Err(err) = outcome {
            return Err(TraitCompilerError::Preanalysis {
                file,
                handler,
                message: err.to_string(),
            });
        }
    }
    Ok(())
}
