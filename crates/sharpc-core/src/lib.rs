//! Core data model for the sharpc conversion engine: type identities,
//! registry entries, the expression/cast node model, and error types.

pub mod entries;
pub mod error;
pub mod expr;
pub mod span;
pub mod type_hash;

pub use entries::{
    ArrayEntry, ClassEntry, DelegateEntry, EnumEntry, GenericInstanceEntry, InterfaceEntry,
    NullableEntry, OperatorEntry, PointerEntry, PrimitiveEntry, PrimitiveKind, StructEntry,
    TypeEntry, TypeParamEntry, Variance,
};
pub use error::CompilationError;
pub use expr::{CastKind, Constant, Expr, ExprKind};
pub use span::Span;
pub use type_hash::{TypeHash, corlib, hash_constants, primitives};
