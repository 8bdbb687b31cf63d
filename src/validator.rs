//! Structural validation of contributing declarations.
//!
//! [`Validator::create_if_valid`] turns one marked method into an
//! [`InjectorDescriptor`], or reports why it can't. Every rule is checked
//! even after an earlier one fails, so a single pass surfaces every problem
//! with the declaration.

use std::borrow::Cow;

use crate::base::Span;
use crate::codegen::AnnotationSpec;
use crate::config::ProcessorOptions;
use crate::descriptor::{DescriptorBuilder, InjectorDescriptor};
use crate::diagnostics::{Anchor, DiagnosticCollector, ErrorKind};
use crate::map_keys::MapKeyChecker;
use crate::model::{
    AnnotationMirror, ClassName, ElementId, MethodElement, MethodId, TypeModel, TypeRef,
};

/// The marker member listing extra modules for the generated injector.
pub const MODULES_MEMBER: &str = "modules";

// ============================================================================
// ERROR REPORTER
// ============================================================================

/// Anchors every report at one declaration and remembers whether any fired.
struct ErrorReporter<'d> {
    subject: ElementId,
    span: Option<Span>,
    diagnostics: &'d mut DiagnosticCollector,
    has_error: bool,
}

impl<'d> ErrorReporter<'d> {
    fn new(subject: MethodId, span: Option<Span>, diagnostics: &'d mut DiagnosticCollector) -> Self {
        Self {
            subject: subject.into(),
            span,
            diagnostics,
            has_error: false,
        }
    }

    fn report(&mut self, kind: ErrorKind, message: String) {
        self.has_error = true;
        let anchor = Anchor::element(self.subject, self.span);
        self.diagnostics.error(kind, anchor, message);
    }

    fn report_at(&mut self, kind: ErrorKind, message: String, annotation: &AnnotationMirror) {
        self.has_error = true;
        let anchor = Anchor::annotation(self.subject, annotation, self.span);
        self.diagnostics.error(kind, anchor, message);
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Checks marked declarations against a type model.
pub struct Validator<'a, M: ?Sized> {
    model: &'a M,
    options: &'a ProcessorOptions,
    /// Recognized base types, in tie-break order.
    bases: Cow<'a, [ClassName]>,
}

impl<'a, M: TypeModel + ?Sized> Validator<'a, M> {
    /// A validator recognizing the configured bases and every base a key
    /// annotation in `model` maps.
    pub fn new(model: &'a M, options: &'a ProcessorOptions) -> Self {
        let bases = MapKeyChecker::new(model, options).recognized_base_types();
        Self {
            model,
            options,
            bases: Cow::Owned(bases),
        }
    }

    /// A validator recognizing exactly `bases`, usually
    /// [`MapKeyIndex::base_types`](crate::map_keys::MapKeyIndex::base_types).
    pub fn with_base_types(model: &'a M, options: &'a ProcessorOptions, bases: &'a [ClassName]) -> Self {
        Self {
            model,
            options,
            bases: Cow::Borrowed(bases),
        }
    }

    pub fn base_types(&self) -> &[ClassName] {
        &self.bases
    }

    /// Validate `method`, returning a descriptor iff no rule was violated.
    ///
    /// Problems are appended to `diagnostics`. A method without the marker
    /// yields `None` and no diagnostics.
    #[tracing::instrument(level = "debug", skip_all, fields(method = ?method_id))]
    pub fn create_if_valid(
        &self,
        method_id: MethodId,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<InjectorDescriptor> {
        let owner = self.model.type_by_id(method_id.owner)?;
        let method = self.model.method(method_id)?;
        let Some(marker) = method.annotation(&self.options.marker) else {
            tracing::trace!("method is not marked; skipping");
            return None;
        };

        let marker_name = self.options.marker.simple_name();
        let mut reporter = ErrorReporter::new(method_id, method.span, diagnostics);
        let mut builder = InjectorDescriptor::builder();
        builder.method_name(method.name.clone());

        if !method.is_abstract {
            reporter.report(
                ErrorKind::StructuralDeclaration,
                format!("@{marker_name} methods must be abstract"),
            );
        }

        if !method.parameters.is_empty() {
            reporter.report(
                ErrorKind::StructuralDeclaration,
                format!("@{marker_name} methods cannot have parameters"),
            );
        }

        if !self.is_module(&owner.name) {
            reporter.report(
                ErrorKind::ModuleReference,
                format!(
                    "@{marker_name} methods must be in a @{}",
                    self.options.module_marker.simple_name()
                ),
            );
        }
        builder.enclosing_module(owner.name.clone());

        self.check_return_type(method, &mut reporter, &mut builder);

        if let Some(modules) = marker.value(MODULES_MEMBER) {
            for module in modules.types() {
                match module.as_class().filter(|class| self.is_module(class)) {
                    Some(class) => {
                        builder.add_module(class.clone());
                    }
                    None => reporter.report_at(
                        ErrorKind::ModuleReference,
                        format!("{module} is not a @{}", self.options.module_marker.simple_name()),
                        marker,
                    ),
                }
            }
        }

        let element = ElementId::Method(method_id);
        for scope in self.model.annotated_annotations(element, &self.options.scope_marker) {
            builder.add_scope(AnnotationSpec::from_mirror(scope));
        }

        for qualifier in self.model.annotated_annotations(element, &self.options.qualifier_marker) {
            reporter.report_at(
                ErrorKind::QualifierNotAllowed,
                format!("@{marker_name} methods cannot have qualifiers"),
                qualifier,
            );
        }

        if reporter.has_error {
            tracing::debug!(method = %method.name, "declaration rejected");
            return None;
        }
        let descriptor = builder.build();
        tracing::debug!(method = %method.name, valid = descriptor.is_some(), "declaration validated");
        descriptor
    }

    /// Classes a declaration names that the model doesn't know yet.
    ///
    /// A non-empty result means the declaration may become valid once a later
    /// round introduces those classes.
    pub fn unresolved_references(&self, method_id: MethodId) -> Vec<ClassName> {
        let Some(method) = self.model.method(method_id) else {
            return Vec::new();
        };
        let mut referenced: Vec<&TypeRef> = vec![&method.return_type];
        if let Some(modules) = method
            .annotation(&self.options.marker)
            .and_then(|marker| marker.value(MODULES_MEMBER))
        {
            referenced.extend(modules.types());
        }

        let mut missing = Vec::new();
        for ty in referenced {
            self.model.collect_unresolved(ty, &mut missing);
        }
        missing
    }

    // Base-type resolution and the parameterized check report independently.
    fn check_return_type(
        &self,
        method: &MethodElement,
        reporter: &mut ErrorReporter<'_>,
        builder: &mut DescriptorBuilder,
    ) {
        let injected = &method.return_type;
        let bases: &[ClassName] = &self.bases;

        match self.model.resolve_base_type(injected, bases) {
            None => reporter.report(
                ErrorKind::TypeResolution,
                format!("{injected} is not a sub-class of {}", describe_bases(bases)),
            ),
            Some(base) => {
                let candidates = bases
                    .iter()
                    .filter(|b| self.model.is_assignable(injected, b))
                    .count();
                if candidates > 1 {
                    tracing::warn!(
                        %injected,
                        chosen = %base,
                        candidates,
                        "return type matches several base types; using the first recognized"
                    );
                }
                builder.base_type(base.clone());
            }
        }

        if injected.is_parameterized() {
            reporter.report(
                ErrorKind::TypeResolution,
                format!(
                    "@{} methods cannot return parametrized types",
                    self.options.marker.simple_name()
                ),
            );
        } else if let Some(class) = injected.as_class() {
            builder.injected_type(class.clone());
        }
    }

    fn is_module(&self, name: &ClassName) -> bool {
        self.model.type_has_annotation(name, &self.options.module_marker)
    }
}

fn describe_bases(bases: &[ClassName]) -> String {
    bases
        .iter()
        .map(ClassName::simple_name)
        .collect::<Vec<_>>()
        .join(" or ")
}
