use std::fmt;

use kiln_ir::Span;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// Where a diagnostic points, and what it says there.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Anchor {
    pub span: Span,
    pub label: String,
}

/// A problem with a declaration or one of its markers.
///
/// Handlers build these and either return them from `analyze`/`resolve`
/// (the trait becomes `Errored`) or from an extended check. The orchestrator
/// builds one itself when two primary markers collide.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub anchor: Option<Anchor>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: String::new(),
            anchor: None,
            notes: Vec::new(),
        }
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Self::error(code)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Point the diagnostic at `span`. A later call replaces the anchor.
    pub fn with_label(mut self, span: Span, label: impl Into<String>) -> Self {
        self.anchor = Some(Anchor {
            span,
            label: label.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.anchor.as_ref().map(|anchor| anchor.span)
    }
}

/// Renders as
///
/// ```text
/// error [E7001]: message
///   --> 20..40: label
///   = note: note
/// ```
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;
        if let Some(anchor) = &self.anchor {
            write!(f, "\n  --> {:?}: {}", anchor.span, anchor.label)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}

/// The class-level diagnostic for a declaration claimed by two primary
/// handlers, `first` (already on the record) and `second`.
pub fn incompatible_markers(
    span: Span,
    declaration: &str,
    first: &str,
    second: &str,
) -> Diagnostic {
    Diagnostic::error(ErrorCode::E7001)
        .with_message(format!(
            "the class `{declaration}` has incompatible markers: \
             `{first}` and `{second}` cannot both apply"
        ))
        .with_label(span, "incompatible markers on this class")
        .with_note("a class may carry at most one primary marker")
}
