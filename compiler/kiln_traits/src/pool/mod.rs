//! Shared constant pool.
//!
//! One pool is threaded through every trait `compile` call of a declaration.
//! Calls run sequentially, so the pool needs no synchronization.

use rustc_hash::FxHashMap;

/// Accumulates shared constants and top-level statements during compilation.
#[derive(Clone, Debug, Default)]
pub struct ConstantPool {
    statements: Vec<String>,
    constants: FxHashMap<String, String>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a literal and return the name of the constant holding it.
    ///
    /// Equal literals share one constant.
    pub fn shared_constant(&mut self, literal: &str) -> String {
        if let Some(name) = self.constants.get(literal) {
            return name.clone();
        }
        let name = format!("_c{}", self.constants.len());
        self.statements.push(format!("const {name} = {literal};"));
        self.constants.insert(literal.to_string(), name.clone());
        name
    }

    pub fn push_statement(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
