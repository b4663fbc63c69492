//! Interface type entries.

use crate::TypeHash;

/// Variance of one generic parameter of an interface template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variance {
    #[default]
    Invariant,
    /// `out T` — arguments may widen along implicit reference conversions.
    Covariant,
    /// `in T` — arguments may narrow along implicit reference conversions.
    Contravariant,
}

/// Registry entry for an interface, or for a generic interface template
/// when `variance` is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceEntry {
    pub name: String,
    pub type_hash: TypeHash,
    /// Interfaces this one extends.
    pub bases: Vec<TypeHash>,
    /// Per-parameter variance for generic templates; empty for plain
    /// interfaces.
    pub variance: Vec<Variance>,
}

impl InterfaceEntry {
    /// Create an interface entry, hashing its qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            bases: Vec::new(),
            variance: Vec::new(),
        }
    }

    /// Create an interface entry with a fixed identity (well-known types).
    pub fn with_hash(name: impl Into<String>, type_hash: TypeHash) -> Self {
        Self {
            name: name.into(),
            type_hash,
            bases: Vec::new(),
            variance: Vec::new(),
        }
    }

    /// Add a base interface.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.bases.push(base);
        self
    }

    /// Declare generic parameter variance, making this a template.
    pub fn with_variance(mut self, variance: Vec<Variance>) -> Self {
        self.variance = variance;
        self
    }
}
