//! Declarations: types and the methods they contain.
//!
//! These mirror what a compiler frontend knows about a declaration after
//! attribution. The builder-style constructors exist so hosts and tests can
//! describe a compilation without a real frontend.

use smol_str::SmolStr;

use crate::base::Span;
use super::{AnnotationMirror, ClassName, TypeRef};

/// The kind of a type declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TypeKind {
    Class,
    Interface,
    Annotation,
}

/// A class, interface or annotation type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeElement {
    pub name: ClassName,
    pub kind: TypeKind,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub is_abstract: bool,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub type_parameters: Vec<SmolStr>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub superclass: Option<TypeRef>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub interfaces: Vec<TypeRef>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Vec<AnnotationMirror>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub methods: Vec<MethodElement>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub span: Option<Span>,
}

impl TypeElement {
    fn with_kind(name: ClassName, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            is_abstract: kind != TypeKind::Class,
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            methods: Vec::new(),
            span: None,
        }
    }

    pub fn class(name: ClassName) -> Self {
        Self::with_kind(name, TypeKind::Class)
    }

    pub fn interface(name: ClassName) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    pub fn annotation_type(name: ClassName) -> Self {
        Self::with_kind(name, TypeKind::Annotation)
    }

    pub fn make_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_type_parameter(mut self, name: impl Into<SmolStr>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn extends(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn annotated(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_method(mut self, method: MethodElement) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Direct supertypes: the superclass first, then interfaces in order.
    pub fn supertypes(&self) -> impl Iterator<Item = &TypeRef> {
        self.superclass.iter().chain(self.interfaces.iter())
    }

    pub fn method(&self, name: &str) -> Option<&MethodElement> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A formal parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub name: SmolStr,
    pub ty: TypeRef,
}

/// A method declared in a type. Annotation members are methods too.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodElement {
    pub name: SmolStr,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub is_abstract: bool,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Vec<AnnotationMirror>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub span: Option<Span>,
}

impl MethodElement {
    pub fn new(name: impl Into<SmolStr>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            parameters: Vec::new(),
            return_type,
            annotations: Vec::new(),
            span: None,
        }
    }

    pub fn make_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_parameter(mut self, name: impl Into<SmolStr>, ty: TypeRef) -> Self {
        self.parameters.push(Parameter { name: name.into(), ty });
        self
    }

    pub fn annotated(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// The first annotation of the given type, if present.
    pub fn annotation(&self, annotation_type: &ClassName) -> Option<&AnnotationMirror> {
        self.annotations.iter().find(|a| a.is(annotation_type))
    }
}
