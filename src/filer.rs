//! File emission: where generated sources end up.
//!
//! The processor hands every rendered compilation unit to a [`Filer`]. A
//! filer accepts each class name at most once across the whole compilation;
//! a second write of the same name is an [`EmitError::AlreadyExists`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::model::{ClassName, MethodId};

/// Errors from writing a generated source.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("{0} was already generated")]
    AlreadyExists(ClassName),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A generated compilation unit as it was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFile {
    pub class_name: ClassName,
    pub contents: Arc<str>,
    /// The declaration this file was generated for.
    pub originating: MethodId,
}

/// Destination for generated sources.
pub trait Filer {
    /// Write the source for `class_name`.
    fn create_source_file(
        &self,
        class_name: &ClassName,
        contents: &str,
        originating: MethodId,
    ) -> Result<(), EmitError>;
}

// ============================================================================
// MEMORY FILER
// ============================================================================

/// Keeps generated files in memory, in write order.
#[derive(Debug, Default)]
pub struct MemoryFiler {
    files: RwLock<IndexMap<ClassName, GeneratedFile>>,
}

impl MemoryFiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The contents generated for `class_name`.
    pub fn contents(&self, class_name: &ClassName) -> Option<Arc<str>> {
        self.files.read().get(class_name).map(|f| f.contents.clone())
    }

    /// Every generated file, in write order.
    pub fn files(&self) -> Vec<GeneratedFile> {
        self.files.read().values().cloned().collect()
    }

    /// Names of every generated class, in write order.
    pub fn class_names(&self) -> Vec<ClassName> {
        self.files.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl Filer for MemoryFiler {
    fn create_source_file(
        &self,
        class_name: &ClassName,
        contents: &str,
        originating: MethodId,
    ) -> Result<(), EmitError> {
        let mut files = self.files.write();
        if files.contains_key(class_name) {
            return Err(EmitError::AlreadyExists(class_name.clone()));
        }
        files.insert(
            class_name.clone(),
            GeneratedFile {
                class_name: class_name.clone(),
                contents: contents.into(),
                originating,
            },
        );
        Ok(())
    }
}

// ============================================================================
// DIRECTORY FILER
// ============================================================================

/// Writes `<root>/<package path>/<TopLevel>.java`.
#[derive(Debug)]
pub struct DirectoryFiler {
    root: PathBuf,
    written: RwLock<FxHashSet<ClassName>>,
}

impl DirectoryFiler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: RwLock::new(FxHashSet::default()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the source for `class_name` is written.
    pub fn path_for(&self, class_name: &ClassName) -> PathBuf {
        let mut path = self.root.clone();
        for segment in class_name.package().split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.java", class_name.top_level().simple_name()));
        path
    }
}

impl Filer for DirectoryFiler {
    fn create_source_file(
        &self,
        class_name: &ClassName,
        contents: &str,
        _originating: MethodId,
    ) -> Result<(), EmitError> {
        let mut written = self.written.write();
        if written.contains(class_name) {
            return Err(EmitError::AlreadyExists(class_name.clone()));
        }

        let path = self.path_for(class_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        tracing::trace!(path = %path.display(), "wrote generated source");

        written.insert(class_name.clone());
        Ok(())
    }
}
