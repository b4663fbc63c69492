//! Generic type parameter entries.

use crate::{TypeHash, corlib};

/// Registry entry for a generic type parameter.
///
/// Conversions from a type parameter go through its effective base class
/// and effective interface set; whether they are reference casts or boxing
/// depends on the reference constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParamEntry {
    pub name: String,
    pub type_hash: TypeHash,
    /// Effective base class; `object` when unconstrained.
    pub effective_base: TypeHash,
    /// Interface constraints.
    pub constraints: Vec<TypeHash>,
    /// Whether a `class` constraint guarantees this is a reference type.
    pub has_reference_constraint: bool,
}

impl TypeParamEntry {
    /// Create an unconstrained type parameter.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            effective_base: corlib::OBJECT,
            constraints: Vec::new(),
            has_reference_constraint: false,
        }
    }

    /// Set the effective base class.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.effective_base = base;
        self
    }

    /// Add an interface constraint.
    pub fn with_constraint(mut self, interface: TypeHash) -> Self {
        self.constraints.push(interface);
        self
    }

    /// Add a `class` (reference type) constraint.
    pub fn reference_constrained(mut self) -> Self {
        self.has_reference_constraint = true;
        self
    }
}
