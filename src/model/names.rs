//! Fully-qualified class names.

use std::fmt;

use smol_str::SmolStr;
use thiserror::Error;

/// Errors from parsing a dotted class name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClassNameError {
    #[error("class name is empty")]
    Empty,
    #[error("'{name}' has an invalid segment '{segment}'")]
    InvalidSegment { name: String, segment: String },
    #[error("'{0}' has no simple name (expected an upper-case segment)")]
    NoSimpleName(String),
}

/// A fully-qualified reference to a class, interface or annotation type.
///
/// Nested types keep every enclosing simple name, outermost first, so
/// `a.b.Outer.Inner` has package `a.b` and simple names `[Outer, Inner]`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct ClassName {
    package: SmolStr,
    simple_names: Vec<SmolStr>,
}

impl ClassName {
    /// Create a top-level class name.
    pub fn new(package: impl Into<SmolStr>, simple_name: impl Into<SmolStr>) -> Self {
        Self {
            package: package.into(),
            simple_names: vec![simple_name.into()],
        }
    }

    /// Parse a dotted name, treating leading lower-case segments as the package.
    ///
    /// `com.example.Outer.Inner` parses as package `com.example` with
    /// simple names `Outer` and `Inner`.
    pub fn parse(name: &str) -> Result<Self, ClassNameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClassNameError::Empty);
        }

        let mut package = Vec::new();
        let mut simple_names = Vec::new();
        for segment in name.split('.') {
            if !is_identifier(segment) {
                return Err(ClassNameError::InvalidSegment {
                    name: name.to_string(),
                    segment: segment.to_string(),
                });
            }
            let upper = segment.chars().next().is_some_and(char::is_uppercase);
            if simple_names.is_empty() && !upper {
                package.push(segment);
            } else {
                simple_names.push(SmolStr::new(segment));
            }
        }

        if simple_names.is_empty() {
            return Err(ClassNameError::NoSimpleName(name.to_string()));
        }

        Ok(Self {
            package: SmolStr::new(package.join(".")),
            simple_names,
        })
    }

    /// A type nested directly inside this one.
    pub fn nested(&self, simple_name: impl Into<SmolStr>) -> Self {
        let mut simple_names = self.simple_names.clone();
        simple_names.push(simple_name.into());
        Self {
            package: self.package.clone(),
            simple_names,
        }
    }

    /// A top-level type in the same package.
    pub fn peer(&self, simple_name: impl Into<SmolStr>) -> Self {
        Self::new(self.package.clone(), simple_name)
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// The innermost simple name.
    pub fn simple_name(&self) -> &str {
        // Construction guarantees at least one simple name.
        self.simple_names.last().map(SmolStr::as_str).unwrap_or_default()
    }

    pub fn simple_names(&self) -> &[SmolStr] {
        &self.simple_names
    }

    /// The outermost type containing this one (itself when top-level).
    pub fn top_level(&self) -> ClassName {
        Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..1].to_vec(),
        }
    }

    pub fn enclosing(&self) -> Option<ClassName> {
        if self.simple_names.len() < 2 {
            return None;
        }
        Some(Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..self.simple_names.len() - 1].to_vec(),
        })
    }

    /// Simple names joined by `.`, as written inside the package.
    pub fn relative_name(&self) -> String {
        self.simple_names.join(".")
    }

    /// The dotted name as written in source, e.g. `a.b.Outer.Inner`.
    pub fn canonical_name(&self) -> String {
        if self.package.is_empty() {
            self.relative_name()
        } else {
            format!("{}.{}", self.package, self.relative_name())
        }
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

impl fmt::Debug for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassName({})", self.canonical_name())
    }
}

impl TryFrom<String> for ClassName {
    type Error = ClassNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClassName> for String {
    fn from(name: ClassName) -> Self {
        name.canonical_name()
    }
}
