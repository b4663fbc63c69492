//! Enum type entries.

use crate::{TypeHash, primitives};

/// Registry entry for an enum type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumEntry {
    pub name: String,
    pub type_hash: TypeHash,
    /// The underlying integral type; `int` unless declared otherwise.
    pub underlying: TypeHash,
}

impl EnumEntry {
    /// Create an enum entry with the default `int` underlying type.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            underlying: primitives::INT,
        }
    }

    /// Set the underlying integral type.
    pub fn with_underlying(mut self, underlying: TypeHash) -> Self {
        self.underlying = underlying;
        self
    }
}
