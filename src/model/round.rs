//! Per-round view of which declarations became visible.

use super::{ClassName, MethodId, TypeDefId, TypeModel};

/// The declarations handed to the processor in one round.
///
/// `roots` are the types that became visible in this round (sources on the
/// first round, freshly generated types afterwards). The symbol table itself
/// holds everything visible so far.
#[derive(Clone, Debug, Default)]
pub struct RoundEnvironment {
    roots: Vec<TypeDefId>,
    processing_over: bool,
}

impl RoundEnvironment {
    pub fn new(roots: impl IntoIterator<Item = TypeDefId>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
            processing_over: false,
        }
    }

    /// The last round: nothing new is visible, deferred work must be settled.
    pub fn final_round() -> Self {
        Self {
            roots: Vec::new(),
            processing_over: true,
        }
    }

    pub fn roots(&self) -> &[TypeDefId] {
        &self.roots
    }

    pub fn processing_over(&self) -> bool {
        self.processing_over
    }

    /// Methods of this round's root types that carry `annotation`.
    pub fn methods_annotated_with<M: TypeModel + ?Sized>(
        &self,
        model: &M,
        annotation: &ClassName,
    ) -> Vec<MethodId> {
        let mut found = Vec::new();
        for &owner in &self.roots {
            let Some(ty) = model.type_by_id(owner) else {
                continue;
            };
            for (local, method) in ty.methods.iter().enumerate() {
                if method.annotation(annotation).is_some() {
                    found.push(MethodId::new(owner, local as u32));
                }
            }
        }
        found
    }
}
