//! Type references and annotation mirrors.

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::Span;
use super::ClassName;

// ============================================================================
// TYPE REFERENCES
// ============================================================================

/// A use of a type, as written in a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum TypeRef {
    /// A class or interface, possibly with type arguments.
    Declared {
        class: ClassName,
        #[cfg_attr(feature = "interchange", serde(default))]
        args: Vec<TypeRef>,
    },
    /// `?` or `? extends Upper`.
    Wildcard {
        #[cfg_attr(feature = "interchange", serde(default))]
        upper: Option<Box<TypeRef>>,
    },
    /// `int`, `boolean`, ...
    Primitive { name: SmolStr },
    Array { component: Box<TypeRef> },
}

impl TypeRef {
    /// A raw (unparameterized) class type.
    pub fn class(class: ClassName) -> Self {
        TypeRef::Declared { class, args: Vec::new() }
    }

    pub fn parameterized(class: ClassName, args: Vec<TypeRef>) -> Self {
        TypeRef::Declared { class, args }
    }

    pub fn primitive(name: impl Into<SmolStr>) -> Self {
        TypeRef::Primitive { name: name.into() }
    }

    /// `? extends upper`
    pub fn wildcard_extends(upper: TypeRef) -> Self {
        TypeRef::Wildcard { upper: Some(Box::new(upper)) }
    }

    /// The erased class of a declared type.
    pub fn as_class(&self) -> Option<&ClassName> {
        match self {
            TypeRef::Declared { class, .. } => Some(class),
            _ => None,
        }
    }

    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Declared { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_parameterized(&self) -> bool {
        !self.type_arguments().is_empty()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Declared { class, args } => {
                write!(f, "{}", class)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Wildcard { upper: None } => f.write_str("?"),
            TypeRef::Wildcard { upper: Some(upper) } => write!(f, "? extends {}", upper),
            TypeRef::Primitive { name } => f.write_str(name),
            TypeRef::Array { component } => write!(f, "{}[]", component),
        }
    }
}

// ============================================================================
// ANNOTATIONS
// ============================================================================

/// A constant value inside an annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum AnnotationValue {
    /// A class literal, `Foo.class`.
    Type { ty: TypeRef },
    Array { items: Vec<AnnotationValue> },
    String { value: SmolStr },
    Int { value: i64 },
    Bool { value: bool },
}

impl AnnotationValue {
    /// Every class literal in this value, flattening nested arrays.
    ///
    /// Non-type leaves are skipped.
    pub fn types(&self) -> Vec<&TypeRef> {
        let mut out = Vec::new();
        self.collect_types(&mut out);
        out
    }

    fn collect_types<'a>(&'a self, out: &mut Vec<&'a TypeRef>) {
        match self {
            AnnotationValue::Type { ty } => out.push(ty),
            AnnotationValue::Array { items } => {
                for item in items {
                    item.collect_types(out);
                }
            }
            _ => {}
        }
    }
}

/// An annotation applied to an element, with its explicitly set members.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationMirror {
    pub annotation_type: ClassName,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub values: IndexMap<SmolStr, AnnotationValue>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub span: Option<Span>,
}

impl AnnotationMirror {
    /// A marker annotation with no members.
    pub fn new(annotation_type: ClassName) -> Self {
        Self {
            annotation_type,
            values: IndexMap::new(),
            span: None,
        }
    }

    pub fn with_value(mut self, name: impl Into<SmolStr>, value: AnnotationValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Set a member to an array of class literals.
    pub fn with_types(self, name: impl Into<SmolStr>, types: impl IntoIterator<Item = TypeRef>) -> Self {
        let items = types.into_iter().map(|ty| AnnotationValue::Type { ty }).collect();
        self.with_value(name, AnnotationValue::Array { items })
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn value(&self, name: &str) -> Option<&AnnotationValue> {
        self.values.get(name)
    }

    pub fn is(&self, annotation_type: &ClassName) -> bool {
        &self.annotation_type == annotation_type
    }
}

impl fmt::Display for AnnotationMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.annotation_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> ClassName {
        ClassName::parse(name).unwrap()
    }

    #[test]
    fn test_type_ref_display() {
        let list = TypeRef::parameterized(
            class("java.util.List"),
            vec![TypeRef::class(class("com.example.MyController"))],
        );
        assert_eq!(list.to_string(), "java.util.List<com.example.MyController>");
        assert_eq!(
            TypeRef::wildcard_extends(TypeRef::class(class("a.Controller"))).to_string(),
            "? extends a.Controller"
        );
        assert_eq!(TypeRef::primitive("int").to_string(), "int");
    }

    #[test]
    fn test_is_parameterized() {
        assert!(!TypeRef::class(class("a.B")).is_parameterized());
        assert!(TypeRef::parameterized(class("a.B"), vec![TypeRef::primitive("int")]).is_parameterized());
        assert!(!TypeRef::primitive("int").is_parameterized());
    }

    #[test]
    fn test_annotation_value_types_flattens_arrays() {
        let value = AnnotationValue::Array {
            items: vec![
                AnnotationValue::Type { ty: TypeRef::class(class("a.One")) },
                AnnotationValue::Array {
                    items: vec![AnnotationValue::Type { ty: TypeRef::class(class("a.Two")) }],
                },
                AnnotationValue::String { value: "ignored".into() },
            ],
        };
        let names: Vec<String> = value.types().iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["a.One", "a.Two"]);
    }

    #[test]
    fn test_annotation_mirror_builders() {
        let mirror = AnnotationMirror::new(class("a.Marker"))
            .with_types("modules", [TypeRef::class(class("a.Extra"))]);
        assert!(mirror.is(&class("a.Marker")));
        assert_eq!(mirror.value("modules").map(|v| v.types().len()), Some(1));
        assert_eq!(mirror.to_string(), "@a.Marker");
    }
}
