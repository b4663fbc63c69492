//! The unified type entry enum.

use crate::entries::{
    ArrayEntry, ClassEntry, DelegateEntry, EnumEntry, GenericInstanceEntry, InterfaceEntry,
    NullableEntry, PointerEntry, PrimitiveEntry, StructEntry, TypeParamEntry,
};
use crate::TypeHash;

/// A registered type, one variant per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeEntry {
    Primitive(PrimitiveEntry),
    Class(ClassEntry),
    Struct(StructEntry),
    Interface(InterfaceEntry),
    Enum(EnumEntry),
    Delegate(DelegateEntry),
    TypeParam(TypeParamEntry),
    Array(ArrayEntry),
    Pointer(PointerEntry),
    Nullable(NullableEntry),
    GenericInstance(GenericInstanceEntry),
}

impl TypeEntry {
    /// The identity of this type.
    pub fn type_hash(&self) -> TypeHash {
        match self {
            TypeEntry::Primitive(e) => e.type_hash(),
            TypeEntry::Class(e) => e.type_hash,
            TypeEntry::Struct(e) => e.type_hash,
            TypeEntry::Interface(e) => e.type_hash,
            TypeEntry::Enum(e) => e.type_hash,
            TypeEntry::Delegate(e) => e.type_hash,
            TypeEntry::TypeParam(e) => e.type_hash,
            TypeEntry::Array(e) => e.type_hash,
            TypeEntry::Pointer(e) => e.type_hash,
            TypeEntry::Nullable(e) => e.type_hash,
            TypeEntry::GenericInstance(e) => e.type_hash,
        }
    }

    /// The declared name, for the kinds that have one.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeEntry::Primitive(e) => Some(e.name()),
            TypeEntry::Class(e) => Some(&e.name),
            TypeEntry::Struct(e) => Some(&e.name),
            TypeEntry::Interface(e) => Some(&e.name),
            TypeEntry::Enum(e) => Some(&e.name),
            TypeEntry::Delegate(e) => Some(&e.name),
            TypeEntry::TypeParam(e) => Some(&e.name),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassEntry> {
        match self {
            TypeEntry::Class(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructEntry> {
        match self {
            TypeEntry::Struct(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceEntry> {
        match self {
            TypeEntry::Interface(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumEntry> {
        match self {
            TypeEntry::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_type_param(&self) -> Option<&TypeParamEntry> {
        match self {
            TypeEntry::TypeParam(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayEntry> {
        match self {
            TypeEntry::Array(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<&PointerEntry> {
        match self {
            TypeEntry::Pointer(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_nullable(&self) -> Option<&NullableEntry> {
        match self {
            TypeEntry::Nullable(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_generic_instance(&self) -> Option<&GenericInstanceEntry> {
        match self {
            TypeEntry::GenericInstance(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PrimitiveEntry> for TypeEntry {
    fn from(e: PrimitiveEntry) -> Self {
        TypeEntry::Primitive(e)
    }
}

impl From<ClassEntry> for TypeEntry {
    fn from(e: ClassEntry) -> Self {
        TypeEntry::Class(e)
    }
}

impl From<StructEntry> for TypeEntry {
    fn from(e: StructEntry) -> Self {
        TypeEntry::Struct(e)
    }
}

impl From<InterfaceEntry> for TypeEntry {
    fn from(e: InterfaceEntry) -> Self {
        TypeEntry::Interface(e)
    }
}

impl From<EnumEntry> for TypeEntry {
    fn from(e: EnumEntry) -> Self {
        TypeEntry::Enum(e)
    }
}

impl From<DelegateEntry> for TypeEntry {
    fn from(e: DelegateEntry) -> Self {
        TypeEntry::Delegate(e)
    }
}

impl From<TypeParamEntry> for TypeEntry {
    fn from(e: TypeParamEntry) -> Self {
        TypeEntry::TypeParam(e)
    }
}

impl From<ArrayEntry> for TypeEntry {
    fn from(e: ArrayEntry) -> Self {
        TypeEntry::Array(e)
    }
}

impl From<PointerEntry> for TypeEntry {
    fn from(e: PointerEntry) -> Self {
        TypeEntry::Pointer(e)
    }
}

impl From<NullableEntry> for TypeEntry {
    fn from(e: NullableEntry) -> Self {
        TypeEntry::Nullable(e)
    }
}

impl From<GenericInstanceEntry> for TypeEntry {
    fn from(e: GenericInstanceEntry) -> Self {
        TypeEntry::GenericInstance(e)
    }
}
