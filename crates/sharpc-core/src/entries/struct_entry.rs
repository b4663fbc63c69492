//! Struct (user value type) entries.

use crate::TypeHash;

/// Registry entry for a struct. Structs are implicitly sealed and derive
/// from `System.ValueType`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructEntry {
    pub name: String,
    pub type_hash: TypeHash,
    pub interfaces: Vec<TypeHash>,
    /// Conversion operators declared on this struct, by operator hash.
    pub conversions: Vec<TypeHash>,
}

impl StructEntry {
    /// Create a struct entry, hashing its qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            interfaces: Vec::new(),
            conversions: Vec::new(),
        }
    }

    /// Create a struct entry with a fixed identity (well-known types).
    pub fn with_hash(name: impl Into<String>, type_hash: TypeHash) -> Self {
        Self {
            name: name.into(),
            type_hash,
            interfaces: Vec::new(),
            conversions: Vec::new(),
        }
    }

    /// Add an implemented interface.
    pub fn with_interface(mut self, interface: TypeHash) -> Self {
        self.interfaces.push(interface);
        self
    }
}
