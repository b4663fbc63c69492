//! Class type entries.

use crate::TypeHash;

/// Registry entry for a class type.
///
/// `base` is `None` only for the root object class; every other class
/// implicitly derives from `object` when no base is given.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassEntry {
    pub name: String,
    pub type_hash: TypeHash,
    pub base: Option<TypeHash>,
    pub interfaces: Vec<TypeHash>,
    /// Conversion operators declared on this class, by operator hash.
    pub conversions: Vec<TypeHash>,
    pub is_sealed: bool,
}

impl ClassEntry {
    /// Create a class entry, hashing its qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            base: None,
            interfaces: Vec::new(),
            conversions: Vec::new(),
            is_sealed: false,
        }
    }

    /// Create a class entry with a fixed identity (well-known types).
    pub fn with_hash(name: impl Into<String>, type_hash: TypeHash) -> Self {
        Self {
            name: name.into(),
            type_hash,
            base: None,
            interfaces: Vec::new(),
            conversions: Vec::new(),
            is_sealed: false,
        }
    }

    /// Set the base class.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented interface.
    pub fn with_interface(mut self, interface: TypeHash) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Mark the class sealed.
    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }
}
