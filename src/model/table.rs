//! The symbol table and the narrow type-model capability built on it.
//!
//! Validation and map-key checking only ever talk to [`TypeModel`], so they
//! can run against any frontend that can answer three questions: what is
//! this type, is it assignable to that class, and what annotations does
//! this element carry. [`SymbolTable`] is the in-crate implementation.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::Span;
use super::{
    AnnotationMirror, ClassName, ElementId, MethodElement, MethodId, TypeDefId, TypeElement,
    TypeRef,
};

/// The root of every class hierarchy; all declared types are assignable to it.
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";

// ============================================================================
// TYPE MODEL CAPABILITY
// ============================================================================

/// What the processor needs to know about the program being compiled.
pub trait TypeModel {
    /// Look up a type declaration by name.
    fn type_element(&self, name: &ClassName) -> Option<&TypeElement>;

    /// Look up a type declaration by id.
    fn type_by_id(&self, id: TypeDefId) -> Option<&TypeElement>;

    /// Whether a value of `ty` may be assigned to a variable of class `target`.
    ///
    /// Type arguments are ignored (erasure semantics).
    fn is_assignable(&self, ty: &TypeRef, target: &ClassName) -> bool;

    /// Annotations directly present on an element.
    fn annotations_of(&self, element: ElementId) -> &[AnnotationMirror];

    /// Every visible type, in discovery order.
    fn type_ids(&self) -> Vec<TypeDefId>;

    fn method(&self, id: MethodId) -> Option<&MethodElement> {
        self.type_by_id(id.owner)?.methods.get(id.local as usize)
    }

    fn span_of(&self, element: ElementId) -> Option<Span> {
        match element {
            ElementId::Type(id) => self.type_by_id(id)?.span,
            ElementId::Method(id) => self.method(id)?.span,
        }
    }

    /// Append to `out` each class named by `ty` (type arguments, wildcard
    /// bounds and array components included) that isn't declared.
    fn collect_unresolved(&self, ty: &TypeRef, out: &mut Vec<ClassName>) {
        match ty {
            TypeRef::Declared { class, args } => {
                if self.type_element(class).is_none() && !out.contains(class) {
                    out.push(class.clone());
                }
                for arg in args {
                    self.collect_unresolved(arg, out);
                }
            }
            TypeRef::Wildcard { upper: Some(upper) } => self.collect_unresolved(upper, out),
            TypeRef::Array { component } => self.collect_unresolved(component, out),
            TypeRef::Wildcard { upper: None } | TypeRef::Primitive { .. } => {}
        }
    }

    /// The first of `bases` that `ty` is assignable to.
    fn resolve_base_type<'b>(&self, ty: &TypeRef, bases: &'b [ClassName]) -> Option<&'b ClassName> {
        bases.iter().find(|base| self.is_assignable(ty, base))
    }

    fn is_annotation_present(&self, element: ElementId, annotation: &ClassName) -> bool {
        self.annotations_of(element).iter().any(|a| a.is(annotation))
    }

    /// Whether the named type is declared and carries `annotation`.
    fn type_has_annotation(&self, name: &ClassName, annotation: &ClassName) -> bool {
        self.type_element(name)
            .is_some_and(|ty| ty.annotations.iter().any(|a| a.is(annotation)))
    }

    /// Annotations on `element` whose own type is annotated with `meta`,
    /// e.g. every scope annotation on a method.
    fn annotated_annotations(&self, element: ElementId, meta: &ClassName) -> Vec<&AnnotationMirror> {
        self.annotations_of(element)
            .iter()
            .filter(|a| self.type_has_annotation(&a.annotation_type, meta))
            .collect()
    }
}

// ============================================================================
// SYMBOL TABLE
// ============================================================================

/// All type declarations visible to the compilation so far.
///
/// Types are stored in a single vector and referenced by [`TypeDefId`].
/// New types may be added between rounds; re-adding a name replaces the
/// declaration in place so existing ids stay valid.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    types: Vec<TypeElement>,
    by_name: FxHashMap<ClassName, TypeDefId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a type declaration, returning its id.
    pub fn add_type(&mut self, ty: TypeElement) -> TypeDefId {
        if let Some(&id) = self.by_name.get(&ty.name) {
            self.types[id.index()] = ty;
            return id;
        }
        let id = TypeDefId::new(self.types.len() as u32);
        self.by_name.insert(ty.name.clone(), id);
        self.types.push(ty);
        id
    }

    pub fn id_of(&self, name: &ClassName) -> Option<TypeDefId> {
        self.by_name.get(name).copied()
    }

    /// All types with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeDefId, &TypeElement)> {
        self.types
            .iter()
            .enumerate()
            .map(|(idx, ty)| (TypeDefId::new(idx as u32), ty))
    }

    pub fn ids(&self) -> impl Iterator<Item = TypeDefId> + '_ {
        (0..self.types.len() as u32).map(TypeDefId::new)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeModel for SymbolTable {
    fn type_element(&self, name: &ClassName) -> Option<&TypeElement> {
        self.id_of(name).and_then(|id| self.types.get(id.index()))
    }

    fn type_by_id(&self, id: TypeDefId) -> Option<&TypeElement> {
        self.types.get(id.index())
    }

    fn is_assignable(&self, ty: &TypeRef, target: &ClassName) -> bool {
        let Some(start) = ty.as_class() else {
            return false;
        };
        if target.canonical_name() == JAVA_LANG_OBJECT {
            return true;
        }

        // Walk the supertype graph; interfaces make it a DAG, not a chain.
        let mut visited: FxHashSet<&ClassName> = FxHashSet::default();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(element) = self.type_element(current) {
                stack.extend(element.supertypes().filter_map(TypeRef::as_class));
            }
        }
        false
    }

    fn type_ids(&self) -> Vec<TypeDefId> {
        self.ids().collect()
    }

    fn annotations_of(&self, element: ElementId) -> &[AnnotationMirror] {
        match element {
            ElementId::Type(id) => self
                .type_by_id(id)
                .map(|ty| ty.annotations.as_slice())
                .unwrap_or_default(),
            ElementId::Method(id) => self
                .method(id)
                .map(|m| m.annotations.as_slice())
                .unwrap_or_default(),
        }
    }
}
