//! Type and operator entries stored in the symbol registry.

mod class;
mod delegate;
mod derived;
mod enum_entry;
mod interface;
mod operator;
mod primitive;
mod struct_entry;
mod type_entry;
mod type_param;

pub use class::ClassEntry;
pub use delegate::DelegateEntry;
pub use derived::{ArrayEntry, GenericInstanceEntry, NullableEntry, PointerEntry};
pub use enum_entry::EnumEntry;
pub use interface::{InterfaceEntry, Variance};
pub use operator::OperatorEntry;
pub use primitive::{PrimitiveEntry, PrimitiveKind};
pub use struct_entry::StructEntry;
pub use type_entry::TypeEntry;
pub use type_param::TypeParamEntry;
