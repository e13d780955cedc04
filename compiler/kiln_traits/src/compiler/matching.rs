//! Matching engine: declaration + registry → class record.

use std::sync::Arc;

use kiln_diagnostic::incompatible_markers;
use kiln_ir::{DeclId, FileId};

use super::TraitCompiler;
use crate::{
    ClassRecord, DecoratorHandler, HandlerPrecedence, RecordId, Trait, TraitCompilerError,
};

impl TraitCompiler {
    /// Whether a declaration of `file` may be matched at all.
    fn is_eligible(&self, decl: DeclId, file: FileId) -> bool {
        if self.config.skip_declaration_files && self.host.is_declaration_file(file) {
            return false;
        }
        self.config.compile_non_exported || self.host.is_exported(decl)
    }

    /// Run every handler's `detect` against a declaration and build (or
    /// update) its record.
    ///
    /// Returns `None` when the declaration is ineligible or nothing matched.
    /// A returned record may be poisoned (`meta_diagnostics` set, no traits).
    pub(super) fn scan_class(
        &mut self,
        decl: DeclId,
    ) -> Result<Option<RecordId>, TraitCompilerError> {
        let host = Arc::clone(&self.host);
        let file = host.file_of(decl);
        if !self.is_eligible(decl, file) {
            tracing::trace!(?decl, "declaration not eligible for matching");
            return Ok(None);
        }

        let markers = host.markers(decl);
        let handlers: Vec<Arc<dyn DecoratorHandler>> = self.registry.iter().cloned().collect();
        let mut record_id = self.by_decl.get(&decl).copied();

        for handler in handlers {
            let Some(detected) = handler.detect(decl, markers) else {
                continue;
            };
            let precedence = handler.precedence();
            let matched = Trait::pending(Arc::clone(&handler), decl, detected);

            // Fast path: first match creates the record.
            let Some(id) = record_id else {
                let mut record = ClassRecord::new(decl, file);
                record.push_trait(matched);
                record_id = Some(self.insert_record(record)?);
                continue;
            };
            let Some(record) = self.record_mut(id) else {
                break;
            };
            if record.meta_diagnostics.is_some() {
                break;
            }

            let is_weak = precedence == HandlerPrecedence::Weak;
            if !is_weak && record.holds_only_weak() {
                tracing::trace!(?decl, handler = handler.name(), "dropping weak traits");
                record.drop_weak_traits();
            } else if is_weak && record.holds_non_weak() {
                tracing::trace!(?decl, handler = handler.name(), "weak match ignored");
                continue;
            }

            if precedence == HandlerPrecedence::Primary && record.has_primary_handler {
                let existing = record.primary_handler_name().unwrap_or_default().to_string();
                tracing::debug!(
                    ?decl,
                    first = %existing,
                    second = handler.name(),
                    "primary handler collision"
                );
                record.poison(incompatible_markers(
                    host.span_of(decl),
                    host.name_of(decl),
                    &existing,
                    handler.name(),
                ));
                break;
            }

            record.push_trait(matched);
        }

        Ok(record_id)
    }
}
