//! Entries for types derived from other types: arrays, pointers,
//! `Nullable<T>`, and generic interface instances.
//!
//! Derived entries compute their own identity from their components, so
//! registering the same derived type twice is idempotent.

use crate::TypeHash;

/// Registry entry for an array type.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayEntry {
    pub type_hash: TypeHash,
    pub element: TypeHash,
    pub rank: u8,
}

impl ArrayEntry {
    pub fn new(element: TypeHash, rank: u8) -> Self {
        Self {
            type_hash: TypeHash::array_of(element, rank),
            element,
            rank,
        }
    }
}

/// Registry entry for a pointer type.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEntry {
    pub type_hash: TypeHash,
    pub element: TypeHash,
}

impl PointerEntry {
    pub fn new(element: TypeHash) -> Self {
        Self {
            type_hash: TypeHash::pointer_to(element),
            element,
        }
    }
}

/// Registry entry for `Nullable<T>`.
#[derive(Debug, Clone, PartialEq)]
pub struct NullableEntry {
    pub type_hash: TypeHash,
    pub underlying: TypeHash,
}

impl NullableEntry {
    pub fn new(underlying: TypeHash) -> Self {
        Self {
            type_hash: TypeHash::nullable_of(underlying),
            underlying,
        }
    }
}

/// Registry entry for an instance of a generic interface template,
/// e.g. `IList<string>`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericInstanceEntry {
    pub type_hash: TypeHash,
    pub template: TypeHash,
    pub args: Vec<TypeHash>,
}

impl GenericInstanceEntry {
    pub fn new(template: TypeHash, args: Vec<TypeHash>) -> Self {
        Self {
            type_hash: TypeHash::generic_instance(template, &args),
            template,
            args,
        }
    }
}
