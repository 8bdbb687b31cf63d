//! JSON interchange for symbol tables.
//!
//! Lets a frontend in another toolchain describe a compilation as JSON and
//! drive the processor without linking Rust code into it:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "com.example.Sample", "kind": "class", "is_abstract": true,
//!       "annotations": [{ "annotation_type": "dagger.Module" }],
//!       "methods": [ ... ] }
//!   ],
//!   "roots": ["com.example.Sample"]
//! }
//! ```
//!
//! `roots` is optional; when absent every listed type is a root.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ClassName, RoundEnvironment, SymbolTable, TypeElement};

#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("malformed compilation snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("round root {0} is not declared in the snapshot")]
    UnknownRoot(ClassName),
}

/// A serialized compilation: its declarations and this round's roots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationSnapshot {
    #[serde(default)]
    pub types: Vec<TypeElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roots: Option<Vec<ClassName>>,
}

impl CompilationSnapshot {
    pub fn from_json(json: &str) -> Result<Self, InterchangeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, InterchangeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add every type to `table` and return the round they make visible.
    ///
    /// Roots may name types in the snapshot or already in `table`. They are
    /// checked before anything is added, so an error leaves `table` untouched.
    pub fn load_into(self, table: &mut SymbolTable) -> Result<RoundEnvironment, InterchangeError> {
        if let Some(names) = &self.roots {
            let declared: FxHashSet<&ClassName> = self.types.iter().map(|ty| &ty.name).collect();
            if let Some(unknown) = names
                .iter()
                .find(|name| !declared.contains(name) && table.id_of(name).is_none())
            {
                return Err(InterchangeError::UnknownRoot(unknown.clone()));
            }
        }

        let mut added = Vec::with_capacity(self.types.len());
        for ty in self.types {
            added.push(table.add_type(ty));
        }

        let roots = match self.roots {
            None => added,
            Some(names) => names.iter().filter_map(|name| table.id_of(name)).collect(),
        };
        tracing::debug!(types = table.len(), roots = roots.len(), "loaded compilation snapshot");
        Ok(RoundEnvironment::new(roots))
    }
}

impl SymbolTable {
    /// Build a table from a JSON snapshot, returning it with its first round.
    pub fn from_json(json: &str) -> Result<(Self, RoundEnvironment), InterchangeError> {
        let mut table = SymbolTable::new();
        let round = CompilationSnapshot::from_json(json)?.load_into(&mut table)?;
        Ok((table, round))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TypeKind, TypeModel, TypeRef};

    const SNAPSHOT: &str = r#"{
        "types": [
            { "name": "com.bluelinelabs.conductor.Controller", "kind": "class", "is_abstract": true },
            { "name": "com.example.MyController", "kind": "class",
              "superclass": { "kind": "declared", "class": "com.bluelinelabs.conductor.Controller" } },
            { "name": "com.example.Sample", "kind": "class", "is_abstract": true,
              "annotations": [{ "annotation_type": "dagger.Module" }],
              "methods": [{
                  "name": "controllerA",
                  "is_abstract": true,
                  "return_type": { "kind": "declared", "class": "com.example.MyController" },
                  "annotations": [{
                      "annotation_type": "com.christianbahl.conductor.ContributesControllerInjector",
                      "values": {
                          "modules": { "kind": "array", "items": [
                              { "kind": "type", "ty": { "kind": "declared", "class": "com.example.Sample" } }
                          ] }
                      }
                  }]
              }] }
        ],
        "roots": ["com.example.Sample"]
    }"#;

    fn class(name: &str) -> ClassName {
        ClassName::parse(name).unwrap()
    }

    #[test]
    fn test_load_snapshot() {
        let (table, round) = SymbolTable::from_json(SNAPSHOT).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(round.roots(), &[table.id_of(&class("com.example.Sample")).unwrap()]);

        let sample = table.type_element(&class("com.example.Sample")).unwrap();
        assert_eq!(sample.kind, TypeKind::Class);
        let method = &sample.methods[0];
        assert_eq!(method.return_type, TypeRef::class(class("com.example.MyController")));
        let modules = method.annotations[0].value("modules").unwrap().types();
        assert_eq!(modules, vec![&TypeRef::class(class("com.example.Sample"))]);

        assert!(table.is_assignable(
            &TypeRef::class(class("com.example.MyController")),
            &class("com.bluelinelabs.conductor.Controller")
        ));
    }

    #[test]
    fn test_roots_default_to_all_types() {
        let json = r#"{ "types": [
            { "name": "a.A", "kind": "class" },
            { "name": "a.B", "kind": "interface" }
        ] }"#;
        let (_, round) = SymbolTable::from_json(json).unwrap();
        assert_eq!(round.roots().len(), 2);
    }

    #[test]
    fn test_unknown_root_is_rejected() {
        let json = r#"{ "types": [], "roots": ["a.Missing"] }"#;
        let err = SymbolTable::from_json(json).unwrap_err();
        assert!(matches!(err, InterchangeError::UnknownRoot(name) if name == class("a.Missing")));
    }

    #[test]
    fn test_unknown_root_leaves_table_untouched() {
        let mut table = SymbolTable::new();
        table.add_type(TypeElement::class(class("a.Existing")));
        let snapshot = CompilationSnapshot::from_json(
            r#"{ "types": [{ "name": "a.New", "kind": "class" }], "roots": ["a.New", "a.Missing"] }"#,
        )
        .unwrap();

        let err = snapshot.load_into(&mut table).unwrap_err();

        assert!(matches!(err, InterchangeError::UnknownRoot(name) if name == class("a.Missing")));
        assert_eq!(table.len(), 1);
        assert!(table.id_of(&class("a.New")).is_none());
    }

    #[test]
    fn test_root_may_name_previously_loaded_type() {
        let mut table = SymbolTable::new();
        let existing = table.add_type(TypeElement::class(class("a.Existing")));
        let round = CompilationSnapshot::from_json(r#"{ "types": [], "roots": ["a.Existing"] }"#)
            .unwrap()
            .load_into(&mut table)
            .unwrap();
        assert_eq!(round.roots(), &[existing]);
    }

    #[test]
    fn test_malformed_class_name_is_a_json_error() {
        let json = r#"{ "types": [{ "name": "not a class", "kind": "class" }] }"#;
        assert!(matches!(SymbolTable::from_json(json), Err(InterchangeError::Json(_))));
    }

    #[test]
    fn test_snapshot_survives_serialization() {
        let snapshot = CompilationSnapshot::from_json(SNAPSHOT).unwrap();
        let reparsed = CompilationSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(snapshot, reparsed);
    }
}
