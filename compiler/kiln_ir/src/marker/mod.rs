//! Markers attached to declarations.
//!
//! A marker is what a handler's `detect` step looks at: the attribute name,
//! the module it was imported from (if the host resolved it), and where it
//! sits in the source so the orchestrator can hand it back for stripping.

use crate::Span;

/// An attribute attached to a declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Marker {
    /// Attribute name as written, e.g. `Component`.
    pub name: String,
    /// Module specifier the attribute was imported from, if known.
    pub module: Option<String>,
    /// Location of the attribute.
    pub span: Span,
}

impl Marker {
    /// Create a marker with no known origin module.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Marker {
            name: name.into(),
            module: None,
            span,
        }
    }

    /// Set the module specifier the marker was imported from.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Check whether this marker has the given name and, when given, module.
    pub fn is(&self, name: &str, module: Option<&str>) -> bool {
        self.name == name && (module.is_none() || self.module.as_deref() == module)
    }
}
