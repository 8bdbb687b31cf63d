//! The resolved description of one contributed injector.

use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::codegen::AnnotationSpec;
use crate::model::ClassName;

/// A validated contribution, ready for generation.
///
/// Only the validator builds these, and only for declarations that produced
/// no diagnostics, so every field is known to satisfy its invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectorDescriptor {
    injected_type: ClassName,
    base_type: ClassName,
    scopes: IndexSet<AnnotationSpec>,
    modules: IndexSet<ClassName>,
    enclosing_module: ClassName,
    method_name: SmolStr,
}

impl InjectorDescriptor {
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    /// The concrete type to be injected; the declaration's return type.
    pub fn injected_type(&self) -> &ClassName {
        &self.injected_type
    }

    /// The recognized base type `injected_type` was resolved to.
    pub fn base_type(&self) -> &ClassName {
        &self.base_type
    }

    /// Scopes to apply to the generated injector.
    pub fn scopes(&self) -> &IndexSet<AnnotationSpec> {
        &self.scopes
    }

    /// Extra modules listed on the marker.
    pub fn modules(&self) -> &IndexSet<ClassName> {
        &self.modules
    }

    /// The module that contains the declaration.
    pub fn enclosing_module(&self) -> &ClassName {
        &self.enclosing_module
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// The listed modules followed by the enclosing module, without repeats.
    pub fn injector_modules(&self) -> IndexSet<ClassName> {
        let mut modules = self.modules.clone();
        modules.insert(self.enclosing_module.clone());
        modules
    }

    /// The key annotation that files this injector under `injected_type`,
    /// e.g. `@ControllerKey(MyController.class)`.
    pub fn map_key_annotation(&self, key_type: &ClassName) -> AnnotationSpec {
        AnnotationSpec::new(key_type.clone()).class_member("value", self.injected_type.clone())
    }
}

/// Accumulates descriptor fields while a declaration is validated.
#[derive(Debug, Default)]
pub struct DescriptorBuilder {
    injected_type: Option<ClassName>,
    base_type: Option<ClassName>,
    scopes: IndexSet<AnnotationSpec>,
    modules: IndexSet<ClassName>,
    enclosing_module: Option<ClassName>,
    method_name: Option<SmolStr>,
}

impl DescriptorBuilder {
    pub fn injected_type(&mut self, injected_type: ClassName) -> &mut Self {
        self.injected_type = Some(injected_type);
        self
    }

    pub fn base_type(&mut self, base_type: ClassName) -> &mut Self {
        self.base_type = Some(base_type);
        self
    }

    pub fn add_scope(&mut self, scope: AnnotationSpec) -> &mut Self {
        self.scopes.insert(scope);
        self
    }

    pub fn add_module(&mut self, module: ClassName) -> &mut Self {
        self.modules.insert(module);
        self
    }

    pub fn enclosing_module(&mut self, enclosing_module: ClassName) -> &mut Self {
        self.enclosing_module = Some(enclosing_module);
        self
    }

    pub fn method_name(&mut self, method_name: impl Into<SmolStr>) -> &mut Self {
        self.method_name = Some(method_name.into());
        self
    }

    /// Finish the descriptor; `None` if a required field was never set.
    pub fn build(self) -> Option<InjectorDescriptor> {
        Some(InjectorDescriptor {
            injected_type: self.injected_type?,
            base_type: self.base_type?,
            scopes: self.scopes,
            modules: self.modules,
            enclosing_module: self.enclosing_module?,
            method_name: self.method_name?,
        })
    }
}
