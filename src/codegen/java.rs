//! Structured building blocks for generated Java sources.
//!
//! Generated code is assembled from these values and rendered in one pass
//! by [`JavaFile::render`]. Nothing here concatenates source fragments by
//! hand, so output is well-formed by construction and, because every
//! collection is ordered, equal inputs always render identical text.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use smol_str::SmolStr;

use crate::model::{AnnotationMirror, AnnotationValue, ClassName, TypeRef};
use super::writer::CodeWriter;

// ============================================================================
// TYPE NAMES
// ============================================================================

/// A type as it appears in generated code.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeName {
    Class(ClassName),
    Parameterized { raw: ClassName, args: Vec<TypeName> },
    /// `? extends bound`
    WildcardExtends(Box<TypeName>),
}

impl TypeName {
    pub fn parameterized(raw: ClassName, args: Vec<TypeName>) -> Self {
        TypeName::Parameterized { raw, args }
    }

    pub fn subtype_of(bound: TypeName) -> Self {
        TypeName::WildcardExtends(Box::new(bound))
    }

    fn collect_classes(&self, out: &mut BTreeSet<ClassName>) {
        match self {
            TypeName::Class(class) => {
                out.insert(class.clone());
            }
            TypeName::Parameterized { raw, args } => {
                out.insert(raw.clone());
                for arg in args {
                    arg.collect_classes(out);
                }
            }
            TypeName::WildcardExtends(bound) => bound.collect_classes(out),
        }
    }

    fn render(&self, w: &CodeWriter) -> String {
        match self {
            TypeName::Class(class) => w.class_ref(class),
            TypeName::Parameterized { raw, args } => {
                let args: Vec<String> = args.iter().map(|a| a.render(w)).collect();
                format!("{}<{}>", w.class_ref(raw), args.join(", "))
            }
            TypeName::WildcardExtends(bound) => format!("? extends {}", bound.render(w)),
        }
    }
}

impl From<ClassName> for TypeName {
    fn from(class: ClassName) -> Self {
        TypeName::Class(class)
    }
}

// ============================================================================
// ANNOTATIONS
// ============================================================================

/// A constant inside a generated annotation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationMember {
    ClassLiteral(ClassName),
    Str(SmolStr),
    /// Rendered verbatim: numbers and booleans.
    Literal(SmolStr),
    Array(Vec<AnnotationMember>),
}

impl AnnotationMember {
    fn from_value(value: &AnnotationValue) -> Self {
        match value {
            AnnotationValue::Type { ty } => match ty {
                TypeRef::Declared { class, .. } => AnnotationMember::ClassLiteral(class.clone()),
                other => AnnotationMember::Literal(SmolStr::new(format!("{}.class", other))),
            },
            AnnotationValue::Array { items } => {
                AnnotationMember::Array(items.iter().map(Self::from_value).collect())
            }
            AnnotationValue::String { value } => AnnotationMember::Str(value.clone()),
            AnnotationValue::Int { value } => AnnotationMember::Literal(SmolStr::new(value.to_string())),
            AnnotationValue::Bool { value } => AnnotationMember::Literal(SmolStr::new(value.to_string())),
        }
    }

    fn collect_classes(&self, out: &mut BTreeSet<ClassName>) {
        match self {
            AnnotationMember::ClassLiteral(class) => {
                out.insert(class.clone());
            }
            AnnotationMember::Array(items) => {
                for item in items {
                    item.collect_classes(out);
                }
            }
            AnnotationMember::Str(_) | AnnotationMember::Literal(_) => {}
        }
    }

    fn render(&self, w: &CodeWriter) -> String {
        match self {
            AnnotationMember::ClassLiteral(class) => format!("{}.class", w.class_ref(class)),
            AnnotationMember::Str(value) => quote(value),
            AnnotationMember::Literal(value) => value.to_string(),
            // Single-element arrays drop the braces, as javac allows.
            AnnotationMember::Array(items) if items.len() == 1 => items[0].render(w),
            AnnotationMember::Array(items) => {
                let items: Vec<String> = items.iter().map(|i| i.render(w)).collect();
                format!("{{{}}}", items.join(", "))
            }
        }
    }
}

/// An annotation to place on a generated element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnotationSpec {
    pub annotation_type: ClassName,
    members: Vec<(SmolStr, AnnotationMember)>,
}

impl AnnotationSpec {
    pub fn new(annotation_type: ClassName) -> Self {
        Self {
            annotation_type,
            members: Vec::new(),
        }
    }

    /// Copy an annotation as it was written on a source element.
    pub fn from_mirror(mirror: &AnnotationMirror) -> Self {
        Self {
            annotation_type: mirror.annotation_type.clone(),
            members: mirror
                .values
                .iter()
                .map(|(name, value)| (name.clone(), AnnotationMember::from_value(value)))
                .collect(),
        }
    }

    /// Set (or replace) a member.
    pub fn member(mut self, name: impl Into<SmolStr>, value: AnnotationMember) -> Self {
        let name = name.into();
        match self.members.iter_mut().find(|slot| slot.0 == name) {
            Some(slot) => slot.1 = value,
            None => self.members.push((name, value)),
        }
        self
    }

    pub fn class_member(self, name: impl Into<SmolStr>, class: ClassName) -> Self {
        self.member(name, AnnotationMember::ClassLiteral(class))
    }

    pub fn string_member(self, name: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.member(name, AnnotationMember::Str(value.into()))
    }

    pub fn members(&self) -> &[(SmolStr, AnnotationMember)] {
        &self.members
    }

    fn collect_classes(&self, out: &mut BTreeSet<ClassName>) {
        out.insert(self.annotation_type.clone());
        for (_, member) in &self.members {
            member.collect_classes(out);
        }
    }

    fn render(&self, w: &CodeWriter) -> String {
        let mut out = format!("@{}", w.class_ref(&self.annotation_type));
        match self.members.as_slice() {
            [] => {}
            [(name, value)] if name == "value" => {
                let _ = write!(out, "({})", value.render(w));
            }
            members => {
                let members: Vec<String> = members
                    .iter()
                    .map(|(name, value)| format!("{} = {}", name, value.render(w)))
                    .collect();
                let _ = write!(out, "({})", members.join(", "));
            }
        }
        out
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ============================================================================
// METHODS AND TYPES
// ============================================================================

/// Declaration modifiers, ordered as they are conventionally written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }
}

fn modifier_prefix(modifiers: &BTreeSet<Modifier>) -> String {
    modifiers.iter().map(|m| format!("{} ", m.keyword())).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterSpec {
    pub ty: TypeName,
    pub name: SmolStr,
}

/// A method or constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSpec {
    pub name: SmolStr,
    pub annotations: Vec<AnnotationSpec>,
    pub modifiers: BTreeSet<Modifier>,
    /// `None` for constructors.
    pub return_type: Option<TypeName>,
    pub parameters: Vec<ParameterSpec>,
    /// Statements; ignored for abstract methods.
    pub body: Vec<SmolStr>,
}

impl MethodSpec {
    pub fn method(name: impl Into<SmolStr>, return_type: TypeName) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            return_type: Some(return_type),
            parameters: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A constructor; its name is taken from the enclosing type when rendered.
    pub fn constructor() -> Self {
        Self {
            name: SmolStr::new("<init>"),
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            return_type: None,
            parameters: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn with_parameter(mut self, ty: TypeName, name: impl Into<SmolStr>) -> Self {
        self.parameters.push(ParameterSpec { ty, name: name.into() });
        self
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(&Modifier::Abstract)
    }

    fn collect_classes(&self, out: &mut BTreeSet<ClassName>) {
        for annotation in &self.annotations {
            annotation.collect_classes(out);
        }
        if let Some(ty) = &self.return_type {
            ty.collect_classes(out);
        }
        for param in &self.parameters {
            param.ty.collect_classes(out);
        }
    }

    fn render(&self, w: &mut CodeWriter, enclosing: &str, in_interface: bool) {
        for annotation in &self.annotations {
            let line = annotation.render(w);
            w.writeln(&line);
        }

        let names: &CodeWriter = w;
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.ty.render(names), p.name))
            .collect();
        let signature = match &self.return_type {
            Some(ty) => format!(
                "{}{} {}({})",
                modifier_prefix(&self.modifiers),
                ty.render(names),
                self.name,
                params.join(", ")
            ),
            None => format!(
                "{}{}({})",
                modifier_prefix(&self.modifiers),
                enclosing,
                params.join(", ")
            ),
        };

        if self.is_abstract() || (in_interface && self.body.is_empty() && self.return_type.is_some()) {
            w.writeln(&format!("{};", signature));
            return;
        }
        w.writeln(&format!("{} {{", signature));
        w.indent();
        for statement in &self.body {
            w.writeln(statement);
        }
        w.dedent();
        w.writeln("}");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeSpecKind {
    Class,
    Interface,
}

/// A class or interface declaration, possibly with nested types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeSpec {
    pub kind: TypeSpecKind,
    pub name: SmolStr,
    pub annotations: Vec<AnnotationSpec>,
    pub modifiers: BTreeSet<Modifier>,
    pub superclass: Option<TypeName>,
    pub superinterfaces: Vec<TypeName>,
    pub methods: Vec<MethodSpec>,
    pub types: Vec<TypeSpec>,
}

impl TypeSpec {
    fn with_kind(kind: TypeSpecKind, name: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            name: name.into(),
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            superclass: None,
            superinterfaces: Vec::new(),
            methods: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn class(name: impl Into<SmolStr>) -> Self {
        Self::with_kind(TypeSpecKind::Class, name)
    }

    pub fn interface(name: impl Into<SmolStr>) -> Self {
        Self::with_kind(TypeSpecKind::Interface, name)
    }

    pub fn annotated(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn extends(mut self, superclass: TypeName) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: TypeName) -> Self {
        self.superinterfaces.push(interface);
        self
    }

    pub fn with_method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_type(mut self, nested: TypeSpec) -> Self {
        self.types.push(nested);
        self
    }

    fn collect_classes(&self, out: &mut BTreeSet<ClassName>) {
        for annotation in &self.annotations {
            annotation.collect_classes(out);
        }
        if let Some(superclass) = &self.superclass {
            superclass.collect_classes(out);
        }
        for interface in &self.superinterfaces {
            interface.collect_classes(out);
        }
        for method in &self.methods {
            method.collect_classes(out);
        }
        for nested in &self.types {
            nested.collect_classes(out);
        }
    }

    /// `name` and the names of every type nested in it.
    fn collect_declared(&self, name: ClassName, out: &mut Vec<ClassName>) {
        for nested in &self.types {
            nested.collect_declared(name.nested(nested.name.clone()), out);
        }
        out.push(name);
    }

    fn render(&self, w: &mut CodeWriter) {
        for annotation in &self.annotations {
            let line = annotation.render(w);
            w.writeln(&line);
        }

        let mut header = modifier_prefix(&self.modifiers);
        let in_interface = self.kind == TypeSpecKind::Interface;
        header.push_str(if in_interface { "interface " } else { "class " });
        header.push_str(&self.name);

        // Interfaces list their supertypes after `extends`.
        let (extends, implements): (Vec<&TypeName>, Vec<&TypeName>) = if in_interface {
            (self.superinterfaces.iter().collect(), Vec::new())
        } else {
            (self.superclass.iter().collect(), self.superinterfaces.iter().collect())
        };
        let names: &CodeWriter = w;
        if !extends.is_empty() {
            let rendered: Vec<String> = extends.iter().map(|t| t.render(names)).collect();
            let _ = write!(header, " extends {}", rendered.join(", "));
        }
        if !implements.is_empty() {
            let rendered: Vec<String> = implements.iter().map(|t| t.render(names)).collect();
            let _ = write!(header, " implements {}", rendered.join(", "));
        }
        header.push_str(" {");
        w.writeln(&header);

        w.indent();
        let mut first = true;
        for method in &self.methods {
            if !first {
                w.newline();
            }
            first = false;
            method.render(w, &self.name, in_interface);
        }
        for nested in &self.types {
            if !first {
                w.newline();
            }
            first = false;
            nested.render(w);
        }
        w.dedent();
        w.writeln("}");
    }
}

// ============================================================================
// FILES
// ============================================================================

/// One top-level type in a package, ready to render.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JavaFile {
    pub package: SmolStr,
    pub type_spec: TypeSpec,
}

impl JavaFile {
    pub fn new(package: impl Into<SmolStr>, type_spec: TypeSpec) -> Self {
        Self {
            package: package.into(),
            type_spec,
        }
    }

    /// The name of the top-level type this file declares.
    pub fn class_name(&self) -> ClassName {
        ClassName::new(self.package.clone(), self.type_spec.name.clone())
    }

    /// Render the complete compilation unit.
    pub fn render(&self) -> String {
        let mut referenced = BTreeSet::new();
        self.type_spec.collect_classes(&mut referenced);
        let mut declared = Vec::new();
        self.type_spec.collect_declared(self.class_name(), &mut declared);
        let mut w = CodeWriter::new(self.package.clone(), &referenced, &declared);

        if !self.package.is_empty() {
            w.writeln(&format!("package {};", self.package));
            w.newline();
        }

        let imports: Vec<String> = w.imports().map(|c| format!("import {};", c)).collect();
        if !imports.is_empty() {
            for line in &imports {
                w.writeln(line);
            }
            w.newline();
        }

        self.type_spec.render(&mut w);
        w.finish()
    }
}
