//! # contributes
//!
//! Compile-time validation and source generation for contributed injectors.
//!
//! A configuration module declares, with one abstract marked method, that a
//! concrete controller type should get its own injector:
//!
//! ```java
//! @Module
//! abstract class Sample {
//!   @ContributesControllerInjector(modules = Extra.class)
//!   abstract MyController controllerA();
//! }
//! ```
//!
//! The processor checks that declaration and generates a binding module and
//! a subcomponent that file the injector in a map keyed by controller class.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! processor   → round driver: check, validate, generate, report
//!   ↓
//! validator   → declaration → InjectorDescriptor or diagnostics
//! map_keys    → one key annotation per base type, compilation-wide
//! codegen     → descriptor → Java sources
//!   ↓
//! descriptor  → validated contribution
//! diagnostics → error taxonomy, collector, message sinks
//! filer       → where generated sources are written
//! config      → processor options
//!   ↓
//! model       → symbol table and the TypeModel capability
//!   ↓
//! base        → primitives (FileId, Span)
//! ```

// ============================================================================
// FOUNDATION
// ============================================================================

/// Foundation types: FileId, Span
pub mod base;

/// Program symbols: types, methods, annotations and the type model
pub mod model;

pub mod config;
pub mod diagnostics;

// ============================================================================
// PIPELINE
// ============================================================================

pub mod codegen;
pub mod descriptor;
pub mod filer;
pub mod map_keys;
pub mod processor;
pub mod validator;

/// JSON snapshots of a compilation (requires the `interchange` feature)
#[cfg(feature = "interchange")]
pub mod interchange;

// Re-export the types most hosts need
pub use base::{FileId, LineCol, Span};
pub use config::{ConfigError, ProcessorOptions};
pub use descriptor::InjectorDescriptor;
pub use diagnostics::{
    CollectingMessager, Diagnostic, DiagnosticCollector, ErrorKind, Messager, Severity,
    TracingMessager,
};
pub use filer::{DirectoryFiler, EmitError, Filer, GeneratedFile, MemoryFiler};
pub use model::{ClassName, RoundEnvironment, SymbolTable, TypeModel};
pub use processor::{Processor, RoundOutcome};
