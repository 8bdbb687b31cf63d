//! Code generation: a small structured Java-source layer and the generator
//! that turns descriptors into binding modules and subcomponents.

mod generator;
mod java;
mod writer;

pub use generator::{ContributionGenerator, GeneratedSources};
pub use java::{
    AnnotationMember, AnnotationSpec, JavaFile, MethodSpec, Modifier, ParameterSpec, TypeName,
    TypeSpec, TypeSpecKind,
};
pub use writer::CodeWriter;
