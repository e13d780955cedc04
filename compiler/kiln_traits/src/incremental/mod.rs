//! Incremental dependency store.
//!
//! The orchestrator only *issues* edges; persisting them and walking them on
//! the next build belongs to the store. [`FileDependencyGraph`] is the
//! in-memory store used by single-process drivers and tests.

use rustc_hash::{FxHashMap, FxHashSet};

use kiln_ir::FileId;

/// Receiver of file-level dependency edges.
///
/// `track_file_dependency(dep, src)` means "`src` depends on `dep`": a change
/// to `dep` invalidates `src`.
pub trait IncrementalStore {
    fn track_file_dependency(&mut self, dep: FileId, src: FileId);

    fn track_file_dependencies(&mut self, deps: &[FileId], src: FileId) {
        for &dep in deps {
            self.track_file_dependency(dep, src);
        }
    }

    /// Files `file` currently depends on, sorted.
    fn file_dependencies(&self, file: FileId) -> Vec<FileId>;
}

/// In-memory file dependency graph.
///
/// Self-edges are dropped: every file already invalidates itself.
#[derive(Clone, Debug, Default)]
pub struct FileDependencyGraph {
    deps: FxHashMap<FileId, FxHashSet<FileId>>,
}

impl FileDependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a change to `dep` invalidates `src`.
    pub fn depends_on(&self, src: FileId, dep: FileId) -> bool {
        self.deps.get(&src).is_some_and(|set| set.contains(&dep))
    }

    /// All edges as `(dep, src)` pairs, sorted.
    pub fn edges(&self) -> Vec<(FileId, FileId)> {
        let mut edges: Vec<(FileId, FileId)> = self
            .deps
            .iter()
            .flat_map(|(&src, deps)| deps.iter().map(move |&dep| (dep, src)))
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn edge_count(&self) -> usize {
        self.deps.values().map(FxHashSet::len).sum()
    }
}

impl IncrementalStore for FileDependencyGraph {
    fn track_file_dependency(&mut self, dep: FileId, src: FileId) {
        if dep == src {
            return;
        }
        self.deps.entry(src).or_default().insert(dep);
    }

    fn file_dependencies(&self, file: FileId) -> Vec<FileId> {
        let mut deps: Vec<FileId> = self
            .deps
            .get(&file)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        deps.sort_unstable();
        deps
    }
}
