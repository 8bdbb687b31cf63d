//! Program model: the declarations the processor reasons about.
//!
//! ```text
//! round   → which roots are new this round
//!   ↓
//! table   → SymbolTable + the TypeModel capability
//!   ↓
//! elements, types, names, ids
//! ```

mod elements;
mod ids;
mod names;
mod round;
mod table;
mod types;

pub use elements::{MethodElement, Parameter, TypeElement, TypeKind};
pub use ids::{ElementId, MethodId, TypeDefId};
pub use names::{ClassName, ClassNameError};
pub use round::RoundEnvironment;
pub use table::{SymbolTable, TypeModel, JAVA_LANG_OBJECT};
pub use types::{AnnotationMirror, AnnotationValue, TypeRef};
