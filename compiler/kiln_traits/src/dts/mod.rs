//! Declaration-file transforms.
//!
//! Compilation adds static fields to a class; declaration files must learn
//! about them too. The orchestrator reports every compiled declaration here,
//! including those that produced no fields.

use rustc_hash::FxHashMap;

use kiln_ir::DeclId;

use crate::CompileResult;

/// Sink for declaration-file changes.
pub trait DtsTransformRegistry {
    /// Record the fields compiled for a declaration (possibly none).
    fn add_fields(&mut self, decl: DeclId, results: &[CompileResult]);

    /// Replace the declared type of a declaration.
    fn add_type_replacement(&mut self, decl: DeclId, ty: String);
}

/// A field added to a declaration in its declaration file.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DeclarationField {
    pub name: String,
    pub ty: String,
}

/// In-memory [`DtsTransformRegistry`].
#[derive(Clone, Debug, Default)]
pub struct DtsTransforms {
    fields: FxHashMap<DeclId, Vec<DeclarationField>>,
    type_replacements: FxHashMap<DeclId, String>,
}

impl DtsTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields recorded for a declaration; `None` if it was never compiled.
    pub fn fields_for(&self, decl: DeclId) -> Option<&[DeclarationField]> {
        self.fields.get(&decl).map(Vec::as_slice)
    }

    pub fn was_visited(&self, decl: DeclId) -> bool {
        self.fields.contains_key(&decl)
    }

    pub fn type_replacement(&self, decl: DeclId) -> Option<&str> {
        self.type_replacements.get(&decl).map(String::as_str)
    }
}

impl DtsTransformRegistry for DtsTransforms {
    fn add_fields(&mut self, decl: DeclId, results: &[CompileResult]) {
        self.fields
            .entry(decl)
            .or_default()
            .extend(results.iter().map(|r| DeclarationField {
                name: r.name.clone(),
                ty: r.ty.clone(),
            }));
    }

    fn add_type_replacement(&mut self, decl: DeclId, ty: String) {
        self.type_replacements.insert(decl, ty);
    }
}
