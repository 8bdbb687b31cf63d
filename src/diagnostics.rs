//! Error reporting for contributed injector declarations.
//!
//! The processor never aborts on a bad declaration. Every problem becomes a
//! [`Diagnostic`] anchored at the offending element (and, where it matters,
//! the specific annotation on it), collected in a [`DiagnosticCollector`]
//! and flushed to a [`Messager`] at the end of the round.

use std::fmt;
use std::sync::Arc;

use crate::base::Span;
use crate::model::{AnnotationMirror, ClassName, ElementId};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
///
/// The processor only reports errors; anything it reports fails the build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

/// The category a reported problem belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The declaration is not abstract or takes parameters.
    StructuralDeclaration,
    /// The return type is not a recognized base subtype, or is parameterized.
    TypeResolution,
    /// A listed module (or the declaring type) is not a configuration module.
    ModuleReference,
    /// A qualifier annotation is present on the declaration.
    QualifierNotAllowed,
    /// A base type has no key-mapping annotation, or more than one.
    MapKeyCardinality,
    /// A generated file could not be written.
    Emission,
}

impl ErrorKind {
    /// The stable code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::StructuralDeclaration => codes::STRUCTURAL_DECLARATION,
            ErrorKind::TypeResolution => codes::TYPE_RESOLUTION,
            ErrorKind::ModuleReference => codes::MODULE_REFERENCE,
            ErrorKind::QualifierNotAllowed => codes::QUALIFIER_NOT_ALLOWED,
            ErrorKind::MapKeyCardinality => codes::MAP_KEY_CARDINALITY,
            ErrorKind::Emission => codes::EMISSION,
        }
    }
}

/// Where a diagnostic points.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// The element the problem belongs to.
    pub element: ElementId,
    /// The annotation on `element` the problem is about, if any.
    pub annotation: Option<ClassName>,
    /// Best known source position.
    pub span: Option<Span>,
}

impl Anchor {
    pub fn element(element: impl Into<ElementId>, span: Option<Span>) -> Self {
        Self {
            element: element.into(),
            annotation: None,
            span,
        }
    }

    /// Anchor at an annotation mirror, falling back to the element's span.
    pub fn annotation(
        element: impl Into<ElementId>,
        mirror: &AnnotationMirror,
        element_span: Option<Span>,
    ) -> Self {
        Self {
            element: element.into(),
            annotation: Some(mirror.annotation_type.clone()),
            span: mirror.span.or(element_span),
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: ErrorKind,
    /// The diagnostic message.
    pub message: Arc<str>,
    pub anchor: Anchor,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(kind: ErrorKind, anchor: Anchor, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
            anchor,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code(), self.message)?;
        if let Some(span) = self.anchor.span {
            write!(f, " ({})", span)?;
        }
        Ok(())
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes, one per [`ErrorKind`].
pub mod codes {
    /// Declaration is not abstract or has parameters.
    pub const STRUCTURAL_DECLARATION: &str = "E0101";
    /// Return type doesn't resolve to a recognized base, or is parameterized.
    pub const TYPE_RESOLUTION: &str = "E0102";
    /// Referenced type is not a configuration module.
    pub const MODULE_REFERENCE: &str = "E0103";
    /// Qualifier present on a contributing method.
    pub const QUALIFIER_NOT_ALLOWED: &str = "E0104";
    /// Missing or duplicate key-mapping annotation.
    pub const MAP_KEY_CARDINALITY: &str = "E0105";
    /// Generated source could not be written.
    pub const EMISSION: &str = "E0106";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics for one round.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add an error anchored at `anchor`.
    pub fn error(&mut self, kind: ErrorKind, anchor: Anchor, message: impl Into<Arc<str>>) {
        self.add(Diagnostic::error(kind, anchor, message));
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

// ============================================================================
// MESSAGE SINKS
// ============================================================================

/// The host's compiler message channel.
pub trait Messager {
    fn print_message(&mut self, diagnostic: &Diagnostic);
}

/// Keeps every message it receives; useful for hosts that batch output.
#[derive(Clone, Debug, Default)]
pub struct CollectingMessager {
    messages: Vec<Diagnostic>,
}

impl CollectingMessager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Diagnostic> {
        self.messages
    }
}

impl Messager for CollectingMessager {
    fn print_message(&mut self, diagnostic: &Diagnostic) {
        self.messages.push(diagnostic.clone());
    }
}

/// Forwards messages to `tracing` at error level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingMessager;

impl Messager for TracingMessager {
    fn print_message(&mut self, diagnostic: &Diagnostic) {
        tracing::error!(
            code = diagnostic.code(),
            element = ?diagnostic.anchor.element,
            span = ?diagnostic.anchor.span,
            "{}",
            diagnostic.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{FileId, LineCol};
    use crate::model::{MethodId, TypeDefId};

    fn method_anchor(local: u32) -> Anchor {
        Anchor::element(MethodId::new(TypeDefId::new(0), local), None)
    }

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error(ErrorKind::TypeResolution, method_anchor(0), "bad type");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code(), codes::TYPE_RESOLUTION);
        assert_eq!(diag.to_string(), "error[E0102]: bad type");
    }

    #[test]
    fn test_diagnostic_display_with_span() {
        let span = Span::point(FileId::new(1), LineCol::new(2, 4));
        let anchor = Anchor::element(TypeDefId::new(0), Some(span));
        let diag = Diagnostic::error(ErrorKind::MapKeyCardinality, anchor, "missing key");
        assert_eq!(diag.to_string(), "error[E0105]: missing key (file#1:3:5)");
    }

    #[test]
    fn test_annotation_anchor_prefers_mirror_span() {
        let element_span = Span::point(FileId::new(0), LineCol::new(1, 0));
        let mirror_span = Span::point(FileId::new(0), LineCol::new(0, 2));
        let mirror = AnnotationMirror::new(ClassName::new("a", "Named")).with_span(mirror_span);

        let anchor = Anchor::annotation(TypeDefId::new(0), &mirror, Some(element_span));
        assert_eq!(anchor.span, Some(mirror_span));
        assert_eq!(anchor.annotation, Some(ClassName::new("a", "Named")));

        let bare = AnnotationMirror::new(ClassName::new("a", "Named"));
        let anchor = Anchor::annotation(TypeDefId::new(0), &bare, Some(element_span));
        assert_eq!(anchor.span, Some(element_span));
    }

    #[test]
    fn test_codes_are_distinct() {
        let kinds = [
            ErrorKind::StructuralDeclaration,
            ErrorKind::TypeResolution,
            ErrorKind::ModuleReference,
            ErrorKind::QualifierNotAllowed,
            ErrorKind::MapKeyCardinality,
            ErrorKind::Emission,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_collector_counts_and_take() {
        let mut collector = DiagnosticCollector::new();
        collector.error(ErrorKind::StructuralDeclaration, method_anchor(0), "one");
        collector.error(ErrorKind::StructuralDeclaration, method_anchor(1), "two");
        collector.error(ErrorKind::QualifierNotAllowed, method_anchor(0), "three");

        assert_eq!(collector.error_count(), 3);
        assert!(collector.has_errors());

        let taken = collector.take();
        assert_eq!(taken.len(), 3);
        assert!(collector.is_empty());
        assert!(!collector.has_errors());
    }

    #[test]
    fn test_collecting_messager() {
        let mut messager = CollectingMessager::new();
        messager.print_message(&Diagnostic::error(ErrorKind::Emission, method_anchor(0), "io"));
        assert_eq!(messager.messages().len(), 1);
        assert_eq!(messager.into_messages()[0].kind, ErrorKind::Emission);
    }

    #[test]
    fn test_tracing_messager_without_subscriber() {
        let mut messager = TracingMessager;
        messager.print_message(&Diagnostic::error(ErrorKind::Emission, method_anchor(0), "io"));
    }
}
