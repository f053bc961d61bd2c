//! Collection of diagnostic messages produced by compilation or evaluation.

use rowan::TextRange;

use super::message::{DiagnosticMessage, RelatedInfo};
pub use super::message::Severity;

/// Collection of diagnostic messages from compilation and evaluation.
///
/// This is the concrete backing store for spec.md §6's `Errors` surface: a
/// list of `{position, kind, message, path[]}` records, `kind` being
/// captured via [`Severity`] here and via `cue_core::errors::ErrorCode`
/// where the finer CUE error taxonomy (spec.md §7) matters.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

/// Builder for constructing a diagnostic message.
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn error(&mut self, msg: impl Into<String>, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::error(range, msg),
        }
    }

    pub fn warning(&mut self, msg: impl Into<String>, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::warning(range, msg),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn path(mut self, path: Vec<String>) -> Self {
        self.message.path = path;
        self
    }

    pub fn related_to(mut self, msg: impl Into<String>, range: TextRange) -> Self {
        self.message.related.push(RelatedInfo::new(range, msg));
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

#[cfg(test)]
mod collection_tests {
    use super::*;

    fn range(a: u32, b: u32) -> TextRange {
        TextRange::new(a.into(), b.into())
    }

    #[test]
    fn error_count_ignores_warnings() {
        let mut d = Diagnostics::new();
        d.error("conflicting values", range(0, 1)).emit();
        d.warning("unused let", range(2, 3)).emit();
        assert_eq!(d.error_count(), 1);
        assert_eq!(d.warning_count(), 1);
        assert!(d.has_errors());
    }

    #[test]
    fn path_is_recorded() {
        let mut d = Diagnostics::new();
        d.error("field not allowed", range(0, 1))
            .path(vec!["v".into(), "b".into(), "d".into()])
            .emit();
        let rendered = d.printer().render();
        assert!(rendered.contains("v.b.d"));
    }
}
