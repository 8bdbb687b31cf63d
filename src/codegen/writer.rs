//! Indenting source writer with import-aware name rendering.

use std::collections::{BTreeMap, BTreeSet};

use smol_str::SmolStr;

use crate::model::ClassName;

const INDENT: &str = "  ";

/// Output buffer for one generated compilation unit.
///
/// Decides once, up front, which classes are imported; every later
/// reference goes through [`class_ref`](Self::class_ref) so names are
/// rendered consistently with the import block.
pub struct CodeWriter {
    package: SmolStr,
    /// Top-level classes referenced by simple name.
    imports: BTreeSet<ClassName>,
    /// Every type declared in the file, nested ones included.
    declared: BTreeSet<ClassName>,
    indent: usize,
    output: String,
}

impl CodeWriter {
    /// Create a writer for `package`, choosing imports among `referenced`.
    ///
    /// `declared` are the types declared in the file itself, nested ones
    /// included. Their simple names shadow any other class of the same name,
    /// so such classes are neither imported nor referenced by simple name.
    pub fn new(
        package: impl Into<SmolStr>,
        referenced: &BTreeSet<ClassName>,
        declared: &[ClassName],
    ) -> Self {
        let package = package.into();
        let declared: BTreeSet<ClassName> = declared.iter().cloned().collect();
        let declared_simple: BTreeSet<&str> = declared.iter().map(ClassName::simple_name).collect();

        // Group candidate top-level classes by simple name; BTree ordering
        // keeps the choice deterministic when names collide.
        let mut by_simple: BTreeMap<SmolStr, BTreeSet<ClassName>> = BTreeMap::new();
        for class in referenced {
            let top = class.top_level();
            by_simple
                .entry(SmolStr::new(top.simple_name()))
                .or_default()
                .insert(top);
        }

        // Same-package and locally declared names need no import; anything
        // else sharing such a name, or losing a collision, stays qualified.
        let mut imports = BTreeSet::new();
        for (simple, candidates) in by_simple {
            let in_package = candidates.iter().any(|c| c.package() == package.as_str());
            if in_package || declared_simple.contains(simple.as_str()) {
                continue;
            }
            if let Some(first) = candidates.into_iter().next() {
                imports.insert(first);
            }
        }

        Self {
            package,
            imports,
            declared,
            indent: 0,
            output: String::with_capacity(2048),
        }
    }

    /// Render a class reference, using the simple form when it is imported
    /// or lives in this package.
    pub fn class_ref(&self, class: &ClassName) -> String {
        let top = class.top_level();
        if self.is_shadowed(&top) {
            return class.canonical_name();
        }
        if self.imports.contains(&top) || class.package() == self.package.as_str() {
            return class.relative_name();
        }
        class.canonical_name()
    }

    /// Whether a type declared in this file hides `top`'s simple name.
    fn is_shadowed(&self, top: &ClassName) -> bool {
        self.declared
            .iter()
            .any(|d| d.simple_name() == top.simple_name() && d != top)
    }

    /// The import block, sorted.
    pub fn imports(&self) -> impl Iterator<Item = &ClassName> {
        self.imports.iter().filter(|c| c.package() != "java.lang")
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write a line to output (with indentation and newline).
    pub fn writeln(&mut self, s: &str) {
        for _ in 0..self.indent {
            self.output.push_str(INDENT);
        }
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Write an empty line.
    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Take the generated output.
    pub fn finish(self) -> String {
        self.output
    }
}
