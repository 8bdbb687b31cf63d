//! Identifiers for elements in the symbol table.

use std::fmt;

/// Identifies a type declaration in a [`SymbolTable`](super::SymbolTable).
///
/// Ids are assigned sequentially as types become visible and are never
/// reused within one compilation, so they stay valid across rounds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TypeDefId(pub u32);

impl TypeDefId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeDefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDefId({})", self.0)
    }
}

/// A method declared inside a type.
///
/// Combines the owning type with the method's position among that type's
/// declared methods. Stable as long as the declaration order doesn't change.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct MethodId {
    /// The type declaring this method
    pub owner: TypeDefId,
    /// The index within the owner's method list
    pub local: u32,
}

impl MethodId {
    /// Create a new MethodId.
    #[inline]
    pub const fn new(owner: TypeDefId, local: u32) -> Self {
        Self { owner, local }
    }
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodId({}:{})", self.owner.0, self.local)
    }
}

/// Any element a diagnostic can be anchored at.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ElementId {
    Type(TypeDefId),
    Method(MethodId),
}

impl From<TypeDefId> for ElementId {
    fn from(id: TypeDefId) -> Self {
        ElementId::Type(id)
    }
}

impl From<MethodId> for ElementId {
    fn from(id: MethodId) -> Self {
        ElementId::Method(id)
    }
}
