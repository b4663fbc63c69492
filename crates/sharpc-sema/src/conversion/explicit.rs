//! The explicit conversion cascade.
//!
//! Every implicit conversion is also a valid explicit one, so the cascade
//! starts with the full implicit standard path and only then tries the
//! narrowing rules: enum round trips, numeric narrowing, nullable
//! unwrapping, reference downcasts, and pointer reinterpretation.

use sharpc_core::{CastKind, CompilationError, Expr, TypeHash, corlib, primitives};

use crate::ConversionContext;
use crate::conversion::implicit_standard_conversion;
use crate::conversion::numeric::{explicit_numeric, numeric_kind};
use crate::conversion::reference::explicit_reference;
use crate::conversion::user_defined::user_defined_conversion;

/// Explicit conversion without user-defined operators. Used on the way in
/// and out of a user-defined operator call, where the standard already
/// decided the operator and must not recurse into another lookup.
pub(crate) fn explicit_standard(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Result<Option<Expr>, CompilationError> {
    explicit_cascade(ctx, expr, target, false)
}

pub(crate) fn explicit_cascade(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
    with_user: bool,
) -> Result<Option<Expr>, CompilationError> {
    if let Some(done) = implicit_standard_conversion(ctx, expr, target) {
        return Ok(Some(done));
    }
    if let Some(e) = enum_conversion(ctx, expr, target, with_user)? {
        return Ok(Some(e));
    }
    if let Some(e) = explicit_numeric(ctx, expr, target)? {
        return Ok(Some(e));
    }
    if let Some(e) = explicit_nullable(ctx, expr, target)? {
        return Ok(Some(e));
    }
    if let Some(e) = explicit_reference(ctx, expr, target) {
        return Ok(Some(e));
    }
    if let Some(e) = pointer_conversion(ctx, expr, target) {
        return Ok(Some(e));
    }
    if with_user {
        return user_defined_conversion(ctx, expr, target, true);
    }
    Ok(None)
}

/// Enum casts go through the underlying integral type in both directions.
/// The enum-to-underlying and underlying-to-enum retypes are free at
/// runtime; only a width change in the middle produces real code.
fn enum_conversion(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
    with_user: bool,
) -> Result<Option<Expr>, CompilationError> {
    let reg = ctx.registry();

    // A System.Enum reference narrows to any concrete enum by unboxing.
    if expr.ty == corlib::ENUM_TYPE && reg.is_enum(target) {
        return Ok(Some(Expr::cast(CastKind::Unbox, target, expr.clone())));
    }

    if let Some(under) = reg.enum_underlying(expr.ty) {
        let viewed = Expr::cast(CastKind::Identity, under, expr.clone());
        if under == target {
            return Ok(Some(viewed));
        }
        if let Some(t_under) = reg.enum_underlying(target) {
            let mid = if under == t_under {
                viewed
            } else {
                match explicit_numeric(ctx, &viewed, t_under)? {
                    Some(e) => e,
                    None => return Ok(None),
                }
            };
            return Ok(Some(Expr::cast(CastKind::Identity, target, mid)));
        }
        if numeric_kind(target).is_some() || target == primitives::DECIMAL {
            return explicit_numeric(ctx, &viewed, target);
        }
        return Ok(None);
    }

    if let Some(t_under) = reg.enum_underlying(target) {
        let mid = if expr.ty == t_under {
            expr.clone()
        } else if let Some(e) = explicit_numeric(ctx, expr, t_under)? {
            e
        } else if with_user {
            // IntPtr and UIntPtr reach any enum through their conversion
            // operator to the underlying integral, a historical allowance
            // cast expressions still depend on.
            match user_defined_conversion(ctx, expr, t_under, true)? {
                Some(e) => e,
                None => return Ok(None),
            }
        } else {
            return Ok(None);
        };
        return Ok(Some(Expr::cast(CastKind::Identity, target, mid)));
    }

    Ok(None)
}

/// Explicit nullable conversions: `S?` reaches `T?`, `T`, and back through
/// explicit standard conversions on the underlying types. Unwrapping
/// carries the runtime null check.
fn explicit_nullable(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Result<Option<Expr>, CompilationError> {
    let reg = ctx.registry();

    if let Some(s_under) = reg.nullable_underlying(expr.ty) {
        let unwrapped = Expr::cast(CastKind::UnwrapNullable, s_under, expr.clone());
        if s_under == target {
            return Ok(Some(unwrapped));
        }
        if let Some(t_under) = reg.nullable_underlying(target) {
            let converted = match explicit_cascade(ctx, &unwrapped, t_under, false)? {
                Some(e) => e,
                None => return Ok(None),
            };
            return Ok(Some(Expr::cast(CastKind::Lifted, target, converted)));
        }
        return explicit_cascade(ctx, &unwrapped, target, false);
    }

    if let Some(t_under) = reg.nullable_underlying(target) {
        let converted = match explicit_cascade(ctx, expr, t_under, false)? {
            Some(e) => e,
            None => return Ok(None),
        };
        return Ok(Some(Expr::cast(CastKind::WrapNullable, target, converted)));
    }

    Ok(None)
}

/// Pointer reinterpretation, only in an unsafe context: pointer to
/// pointer, pointer to integral, integral to pointer.
fn pointer_conversion(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Option<Expr> {
    if !ctx.unsafe_allowed() {
        return None;
    }
    let reg = ctx.registry();
    let src_ptr = reg.is_pointer(expr.ty);
    let tgt_ptr = reg.is_pointer(target) || target == TypeHash::pointer_to(primitives::VOID);
    let cast = || Some(Expr::cast(CastKind::PointerCast, target, expr.clone()));

    if src_ptr && tgt_ptr {
        return cast();
    }
    if src_ptr && numeric_kind(target).is_some_and(|k| k.is_integral()) {
        return cast();
    }
    if tgt_ptr && numeric_kind(expr.ty).is_some_and(|k| k.is_integral()) {
        return cast();
    }
    None
}
