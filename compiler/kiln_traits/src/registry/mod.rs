//! Handler registry.
//!
//! An ordered, static list of handlers. Registration order is match order:
//! the matching engine consults handlers front to back, and trait order
//! within a record follows it.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{DecoratorHandler, TraitCompilerError};

/// Ordered handler list with name lookup.
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn DecoratorHandler>>,
    by_name: FxHashMap<String, usize>,
}

impl HandlerRegistry {
    /// Build a registry, rejecting duplicate handler names.
    pub fn new(handlers: Vec<Arc<dyn DecoratorHandler>>) -> Result<Self, TraitCompilerError> {
        let mut by_name = FxHashMap::default();
        for (index, handler) in handlers.iter().enumerate() {
            if by_name.insert(handler.name().to_string(), index).is_some() {
                return Err(TraitCompilerError::DuplicateHandler(
                    handler.name().to_string(),
                ));
            }
        }
        Ok(HandlerRegistry { handlers, by_name })
    }

    /// Handlers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DecoratorHandler>> {
        self.handlers.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DecoratorHandler>> {
        self.by_name.get(name).map(|&index| &self.handlers[index])
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|h| h.name()))
            .finish()
    }
}
