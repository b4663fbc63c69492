//! sharpc: a conversion and overload-resolution engine for a C#-style
//! type system.
//!
//! The engine answers one family of questions: given a resolved expression
//! and a target type, does a conversion exist, which one, and what does
//! the converted expression look like. It covers the full standard
//! conversion set (numeric, reference, boxing, nullable lifting, constant
//! expressions, pointers) plus user-defined conversion operators with the
//! encompassing-type tie-break rules.
//!
//! The workspace splits into three layers, re-exported here:
//!
//! - [`core`]: type identities, registry entries, the expression and cast
//!   node model, and diagnostics.
//! - [`registry`]: hash-keyed symbol storage and the type-system fact
//!   predicates.
//! - [`sema`]: the conversion cascades and operator resolution.
//!
//! ```
//! use sharpc::prelude::*;
//!
//! let registry = SymbolRegistry::with_corlib();
//! let ctx = ConversionContext::new(&registry);
//! let byte_expr = Expr::probe(primitives::BYTE);
//! let widened = implicit_conversion_required(&ctx, &byte_expr, primitives::INT)?;
//! assert_eq!(widened.ty, primitives::INT);
//! # Ok::<(), CompilationError>(())
//! ```

pub use sharpc_core as core;
pub use sharpc_registry as registry;
pub use sharpc_sema as sema;

/// Everything needed to drive the engine.
pub mod prelude {
    pub use sharpc_core::{
        ArrayEntry, CastKind, ClassEntry, CompilationError, Constant, DelegateEntry, EnumEntry,
        Expr, ExprKind, GenericInstanceEntry, InterfaceEntry, NullableEntry, OperatorEntry,
        PointerEntry, PrimitiveEntry, PrimitiveKind, Span, StructEntry, TypeEntry, TypeHash,
        TypeParamEntry, Variance, corlib, primitives,
    };
    pub use sharpc_registry::SymbolRegistry;
    pub use sharpc_sema::{
        ConversionContext, ResolveFlags, explicit_conversion, explicit_standard_conversion,
        find_most_encompassed, find_most_encompassing, implicit_conversion,
        implicit_conversion_exists, implicit_conversion_required, implicit_standard_conversion,
        implicit_standard_conversion_exists, is_unsigned_to_real,
    };
}
