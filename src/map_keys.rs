//! Key-mapping consistency across the whole compilation.
//!
//! Every generated binding is filed in a shared map under a key annotation
//! specific to its base type (`@ControllerKey(MyController.class)`). The
//! generator picks that annotation from the base type alone, so each
//! recognized base must have exactly one key annotation in scope.
//!
//! Recognized bases are the configured ones plus every class some key
//! annotation in the compilation is bounded by.

use indexmap::{IndexMap, IndexSet};

use crate::config::ProcessorOptions;
use crate::diagnostics::{Anchor, DiagnosticCollector, ErrorKind};
use crate::model::{ClassName, TypeDefId, TypeElement, TypeKind, TypeModel, TypeRef};

/// The member a key annotation uses to carry the class literal.
pub const KEY_VALUE_MEMBER: &str = "value";
const JAVA_LANG_CLASS: &str = "java.lang.Class";

/// The recognized base types and the key annotation of each one that has
/// exactly one.
///
/// Bases are ordered configured first, then discovered in declaration
/// order. That is also the tie-break order for base-type resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapKeyIndex {
    bases: Vec<ClassName>,
    keys: IndexMap<ClassName, ClassName>,
    /// Bases the checker already reported a cardinality error for.
    rejected: Vec<ClassName>,
}

impl MapKeyIndex {
    /// Every recognized base type, valid keys or not.
    pub fn base_types(&self) -> &[ClassName] {
        &self.bases
    }

    /// The key annotation for `base`.
    pub fn key_for(&self, base: &ClassName) -> Option<&ClassName> {
        self.keys.get(base)
    }

    /// Whether `base` had a missing or duplicate key reported.
    pub fn is_rejected(&self, base: &ClassName) -> bool {
        self.rejected.contains(base)
    }

    /// `(base type, key annotation)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&ClassName, &ClassName)> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// The base type a key annotation maps, if `ty` is one.
///
/// A key annotation is an annotation type carrying the map-key meta
/// annotation whose `value` member has type `Class<? extends Base>`.
pub fn key_base_type(ty: &TypeElement, map_key_marker: &ClassName) -> Option<ClassName> {
    if ty.kind != TypeKind::Annotation || !ty.annotations.iter().any(|a| a.is(map_key_marker)) {
        return None;
    }
    let value = ty.method(KEY_VALUE_MEMBER)?;
    let TypeRef::Declared { class, args } = &value.return_type else {
        return None;
    };
    if class.canonical_name() != JAVA_LANG_CLASS {
        return None;
    }
    match args.as_slice() {
        [TypeRef::Wildcard { upper: Some(upper) }] => upper.as_class().cloned(),
        _ => None,
    }
}

/// Checks that each recognized base type has exactly one key annotation.
pub struct MapKeyChecker<'a, M: ?Sized> {
    model: &'a M,
    options: &'a ProcessorOptions,
}

impl<'a, M: TypeModel + ?Sized> MapKeyChecker<'a, M> {
    pub fn new(model: &'a M, options: &'a ProcessorOptions) -> Self {
        Self { model, options }
    }

    /// Every key annotation in the compilation, grouped by the base it maps.
    pub fn annotations_by_base_type(&self) -> IndexMap<ClassName, Vec<TypeDefId>> {
        let mut groups: IndexMap<ClassName, Vec<TypeDefId>> = IndexMap::new();
        for id in self.model.type_ids() {
            let Some(ty) = self.model.type_by_id(id) else {
                continue;
            };
            if let Some(base) = key_base_type(ty, &self.options.map_key_marker) {
                groups.entry(base).or_default().push(id);
            }
        }
        groups
    }

    /// Configured bases followed by every base a key annotation maps.
    pub fn recognized_base_types(&self) -> Vec<ClassName> {
        recognized(&self.options.base_types, &self.annotations_by_base_type())
    }

    /// Report missing and duplicate key annotations; return the valid ones.
    ///
    /// Bases that aren't declared anywhere in the compilation are skipped:
    /// nothing can resolve to them, so there is nothing to key.
    #[tracing::instrument(level = "debug", skip_all, fields(configured = self.options.base_types.len()))]
    pub fn check(&self, diagnostics: &mut DiagnosticCollector) -> MapKeyIndex {
        let groups = self.annotations_by_base_type();
        let bases = recognized(&self.options.base_types, &groups);
        let mut index = MapKeyIndex::default();

        for base in &bases {
            let keys = groups.get(base).map(Vec::as_slice).unwrap_or_default();
            match keys {
                [] => {
                    let Some(base_id) = self.type_id(base) else {
                        tracing::trace!(%base, "base type not in compilation; skipping key check");
                        continue;
                    };
                    let anchor = Anchor::element(base_id, self.model.span_of(base_id.into()));
                    diagnostics.error(
                        ErrorKind::MapKeyCardinality,
                        anchor,
                        format!(
                            "No key annotation found for {}; expected exactly one @{} annotation (conventionally {}Key)",
                            base,
                            self.options.map_key_marker.simple_name(),
                            base.simple_name()
                        ),
                    );
                    index.rejected.push(base.clone());
                }
                [only] => {
                    if let Some(key) = self.model.type_by_id(*only) {
                        index.keys.insert(base.clone(), key.name.clone());
                    }
                }
                [first, excess @ ..] => {
                    let first_name = self
                        .model
                        .type_by_id(*first)
                        .map(|ty| ty.name.to_string())
                        .unwrap_or_default();
                    for &dup in excess {
                        let Some(ty) = self.model.type_by_id(dup) else {
                            continue;
                        };
                        let anchor = Anchor::element(dup, ty.span);
                        diagnostics.error(
                            ErrorKind::MapKeyCardinality,
                            anchor,
                            format!(
                                "{} duplicates the key annotation for {}; {} already maps it",
                                ty.name, base, first_name
                            ),
                        );
                    }
                    index.rejected.push(base.clone());
                }
            }
        }

        index.bases = bases;
        tracing::debug!(bases = index.bases.len(), valid = index.len(), "map keys checked");
        index
    }

    fn type_id(&self, name: &ClassName) -> Option<TypeDefId> {
        self.model
            .type_ids()
            .into_iter()
            .find(|&id| self.model.type_by_id(id).is_some_and(|ty| &ty.name == name))
    }
}

fn recognized(configured: &[ClassName], groups: &IndexMap<ClassName, Vec<TypeDefId>>) -> Vec<ClassName> {
    let mut bases: IndexSet<ClassName> = configured.iter().cloned().collect();
    bases.extend(groups.keys().cloned());
    bases.into_iter().collect()
}
