//! Delegate type entries.

use crate::TypeHash;

/// Registry entry for a delegate type. The engine only needs delegates as
/// reference types that convert to `System.Delegate`; signatures stay with
/// the declaration layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegateEntry {
    pub name: String,
    pub type_hash: TypeHash,
}

impl DelegateEntry {
    /// Create a delegate entry, hashing its qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self { name, type_hash }
    }
}
