//! The trait compiler.
//!
//! Owns the record arena, the declaration→record map, the file→declarations
//! index, the re-export table and the generated-symbol table. The phase
//! drivers live in sibling modules, one per phase.
//!
//! # Phase Contract
//!
//! ```text
//! Analysis ──resolve()──► Resolved
//! ```
//!
//! - `analyze*`, `forget_file`, `adopt_file`: only in `Analysis`
//! - `resolve`: exactly once, moves to `Resolved`
//! - `type_check`, `index`, `extended_check`, `compile`: only in `Resolved`
//!
//! Calling an operation in the wrong phase is a [`TraitCompilerError::PhaseOrder`].

mod adopt;
mod analysis;
mod emit;
mod enrich;
mod matching;
mod resolution;

use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use kiln_diagnostic::Diagnostic;
use kiln_ir::{DeclId, FileId, Marker};

use crate::{
    ClassRecord, DeclarationHost, HandlerRegistry, RecordId, TraitCompilerConfig,
    TraitCompilerError,
};

/// Global phase of a [`TraitCompiler`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CompilerPhase {
    /// Files are being matched and analyzed.
    Analysis,
    /// Resolution ran; enrichment and compilation are allowed.
    Resolved,
}

impl fmt::Display for CompilerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerPhase::Analysis => write!(f, "analysis"),
            CompilerPhase::Resolved => write!(f, "resolved"),
        }
    }
}

/// Where a re-exported alias points.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ReexportTarget {
    pub from_module: String,
    pub symbol_name: String,
}

/// Multi-phase orchestrator for marker handlers.
pub struct TraitCompiler {
    host: Arc<dyn DeclarationHost>,
    registry: HandlerRegistry,
    config: TraitCompilerConfig,
    phase: CompilerPhase,
    /// Arena; `None` slots belong to forgotten files until `resolve` compacts it.
    records: Vec<Option<ClassRecord>>,
    by_decl: FxHashMap<DeclId, RecordId>,
    by_file: FxHashMap<FileId, Vec<DeclId>>,
    analyzed_files: FxHashSet<FileId>,
    reexports: FxHashMap<FileId, FxHashMap<String, ReexportTarget>>,
    /// Only files registered through `track_symbols_for` have an entry.
    symbols: FxHashMap<FileId, FxHashSet<String>>,
}

impl TraitCompiler {
    pub fn new(
        host: Arc<dyn DeclarationHost>,
        registry: HandlerRegistry,
        config: TraitCompilerConfig,
    ) -> Self {
        TraitCompiler {
            host,
            registry,
            config,
            phase: CompilerPhase::Analysis,
            records: Vec::new(),
            by_decl: FxHashMap::default(),
            by_file: FxHashMap::default(),
            analyzed_files: FxHashSet::default(),
            reexports: FxHashMap::default(),
            symbols: FxHashMap::default(),
        }
    }

    pub fn phase(&self) -> CompilerPhase {
        self.phase
    }

    pub fn config(&self) -> &TraitCompilerConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    fn expect_phase(
        &self,
        operation: &'static str,
        expected: CompilerPhase,
    ) -> Result<(), TraitCompilerError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(TraitCompilerError::PhaseOrder {
                operation,
                phase: self.phase,
                expected,
            })
        }
    }

    /// Start collecting generated-symbol names for `file`.
    pub fn track_symbols_for(&mut self, file: FileId) {
        self.symbols.entry(file).or_default();
    }

    /// Generated-symbol names recorded for `file`, sorted. `None` if the
    /// file is not tracked.
    pub fn generated_symbols(&self, file: FileId) -> Option<Vec<&str>> {
        self.symbols.get(&file).map(|names| {
            let mut names: Vec<&str> = names.iter().map(String::as_str).collect();
            names.sort_unstable();
            names
        })
    }

    fn record_symbol(&mut self, file: FileId, name: Option<String>) {
        if let (Some(name), Some(names)) = (name, self.symbols.get_mut(&file)) {
            names.insert(name);
        }
    }

    pub fn record_for(&self, decl: DeclId) -> Option<&ClassRecord> {
        self.by_decl
            .get(&decl)
            .and_then(|id| self.records[id.index()].as_ref())
    }

    /// Records of a file in discovery order.
    pub fn records_for(&self, file: FileId) -> Vec<&ClassRecord> {
        self.by_file
            .get(&file)
            .into_iter()
            .flatten()
            .filter_map(|decl| self.record_for(*decl))
            .collect()
    }

    /// Every file with at least one record, with its records, sorted by file.
    pub fn analyzed_records(&self) -> Vec<(FileId, Vec<&ClassRecord>)> {
        let mut files: Vec<FileId> = self.by_file.keys().copied().collect();
        files.sort_unstable();
        files
            .into_iter()
            .map(|file| (file, self.records_for(file)))
            .collect()
    }

    /// All live records in discovery order.
    pub fn records(&self) -> impl Iterator<Item = &ClassRecord> {
        self.records.iter().flatten()
    }

    /// Class-level and trait-level diagnostics accumulated so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for record in self.records() {
            if let Some(meta) = record.meta_diagnostics() {
                diagnostics.extend(meta.iter().cloned());
            }
            for t in record.traits() {
                diagnostics.extend(t.diagnostics().iter().cloned());
            }
        }
        diagnostics
    }

    /// Per-file re-export table: file → alias → target.
    pub fn export_statements(&self) -> &FxHashMap<FileId, FxHashMap<String, ReexportTarget>> {
        &self.reexports
    }

    /// Trigger markers of the resolved traits of a declaration, for stripping.
    pub fn decorators_for(&self, decl: DeclId) -> Vec<Marker> {
        let original = self.host.original_of(decl);
        let Some(record) = self.record_for(original) else {
            return Vec::new();
        };
        record
            .traits()
            .iter()
            .filter(|t| t.is_resolved())
            .filter_map(|t| t.detected().trigger.clone())
            .collect()
    }

    fn insert_record(&mut self, record: ClassRecord) -> Result<RecordId, TraitCompilerError> {
        let id = RecordId::from_index(self.records.len()).ok_or(TraitCompilerError::RecordLimit)?;
        let (decl, file) = (record.decl, record.file);
        self.records.push(Some(record));
        self.by_decl.insert(decl, id);
        let decls = self.by_file.entry(file).or_default();
        if !decls.contains(&decl) {
            decls.push(decl);
        }
        Ok(id)
    }

    /// Drop the slots freed by `forget_file` and re-key the declaration map.
    fn compact_records(&mut self) {
        let before = self.records.len();
        self.records.retain(Option::is_some);
        if self.records.len() == before {
            return;
        }
        self.by_decl.clear();
        for (index, record) in self.records.iter().enumerate() {
            if let (Some(record), Some(id)) = (record, RecordId::from_index(index)) {
                self.by_decl.insert(record.decl, id);
            }
        }
        tracing::debug!(
            reclaimed = before - self.records.len(),
            "compacted record arena"
        );
    }

    fn record_mut(&mut self, id: RecordId) -> Option<&mut ClassRecord> {
        self.records.get_mut(id.index()).and_then(Option::as_mut)
    }
}

impl fmt::Debug for TraitCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraitCompiler")
            .field("phase", &self.phase)
            .field("registry", &self.registry)
            .field("records", &self.by_decl.len())
            .field("files", &self.by_file.len())
            .finish_non_exhaustive()
    }
}
