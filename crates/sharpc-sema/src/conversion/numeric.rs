//! The numeric conversion tables.
//!
//! One widening matrix shared by the implicit cascade and the explicit
//! superset; narrowing is every remaining primitive pair, named by its
//! (from, to) mode and split into checked and unchecked forms. Decimal sits
//! outside the matrix: it has no arithmetic conversion instruction and is
//! reached only through the dedicated wrap/unwrap nodes.

use sharpc_core::{CastKind, CompilationError, Expr, PrimitiveKind, TypeHash, primitives};

use crate::ConversionContext;

/// The primitive kind of `ty` when it participates in the numeric tables.
pub(crate) fn numeric_kind(ty: TypeHash) -> Option<PrimitiveKind> {
    PrimitiveKind::from_hash(ty).filter(|k| k.is_numeric())
}

/// The implicit widening matrix. Asymmetric by construction: every entry is
/// value-preserving (float/double rounding permitted), so the reverse
/// direction never appears.
pub(crate) fn widens_to(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    use PrimitiveKind::*;
    matches!(
        (from, to),
        (SByte, Short | Int | Long | Float | Double)
            | (Byte, Short | UShort | Int | UInt | Long | ULong | Float | Double)
            | (Short, Int | Long | Float | Double)
            | (UShort, Int | UInt | Long | ULong | Float | Double)
            | (Int, Long | Float | Double)
            | (UInt, Long | ULong | Float | Double)
            | (Long | ULong, Float | Double)
            | (Char, UShort | Int | UInt | Long | ULong | Float | Double)
            | (Float, Double)
    )
}

/// Whether a widening must route through the unsigned-to-real reinterpret
/// step before the final float conversion. Code generation asks this to
/// emit the two-instruction form; the conversion node itself stays a
/// plain widen.
pub fn is_unsigned_to_real(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    use PrimitiveKind::*;
    matches!(from, UInt | ULong) && matches!(to, Float | Double)
}

/// Implicit numeric conversion: widening matrix plus integral-to-decimal.
/// Constant sources fold to a retyped constant instead of a cast node.
pub(crate) fn implicit_numeric(expr: &Expr, target: TypeHash) -> Option<Expr> {
    let from = numeric_kind(expr.ty)?;
    if target == primitives::DECIMAL {
        return from
            .is_integral()
            .then(|| Expr::cast(CastKind::DecimalIn, target, expr.clone()));
    }
    let to = numeric_kind(target)?;
    if !widens_to(from, to) {
        return None;
    }
    if let Some(c) = expr.as_constant()
        && let Some(folded) = c.retyped(to)
    {
        return Some(Expr::constant(folded, expr.span));
    }
    Some(Expr::cast(CastKind::NumericWiden { from, to }, target, expr.clone()))
}

/// Constant-expression conversions: an int constant in the target's range,
/// and a non-negative long constant to ulong. These convert even without a
/// general numeric rule, and always fold.
pub(crate) fn implicit_constant(expr: &Expr, target: TypeHash) -> Option<Expr> {
    let c = expr.as_constant()?;
    let to = PrimitiveKind::from_hash(target).filter(|k| k.is_integral())?;
    let folded = match c {
        sharpc_core::Constant::Int(_) if c.fits(to) => c.retyped(to)?,
        sharpc_core::Constant::Long(v) if to == PrimitiveKind::ULong && *v >= 0 => c.retyped(to)?,
        _ => return None,
    };
    Some(Expr::constant(folded, expr.span))
}

/// Explicit numeric conversion: the full matrix. Widenings reuse the
/// implicit rule; anything else between two table kinds is a narrowing,
/// checked or truncating per the context. Decimal converts in and out of
/// every numeric kind explicitly.
///
/// Constant sources fold; under checked arithmetic an out-of-range constant
/// is a hard error rather than a runtime trap.
pub(crate) fn explicit_numeric(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Result<Option<Expr>, CompilationError> {
    if expr.ty == primitives::DECIMAL {
        return Ok(numeric_kind(target)
            .map(|_| Expr::cast(CastKind::DecimalOut, target, expr.clone())));
    }
    let Some(from) = numeric_kind(expr.ty) else {
        return Ok(None);
    };
    if target == primitives::DECIMAL {
        return Ok(Some(Expr::cast(CastKind::DecimalIn, target, expr.clone())));
    }
    let Some(to) = numeric_kind(target) else {
        return Ok(None);
    };
    if from == to {
        return Ok(None);
    }
    if let Some(widened) = implicit_numeric(expr, target) {
        return Ok(Some(widened));
    }
    if let Some(c) = expr.as_constant() {
        if let Some(folded) = c.retyped(to) {
            return Ok(Some(Expr::constant(folded, expr.span)));
        }
        if ctx.checked() {
            return Err(CompilationError::ConstantOutOfRange {
                value: c.to_string(),
                target: ctx.type_name(target),
                span: expr.span,
            });
        }
        if let Some(wrapped) = c.wrapped(to) {
            return Ok(Some(Expr::constant(wrapped, expr.span)));
        }
        // Out-of-range real constant in unchecked context: leave the
        // truncation to runtime.
    }
    Ok(Some(Expr::cast(
        CastKind::NumericNarrow {
            from,
            to,
            checked: ctx.checked(),
        },
        target,
        expr.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrimitiveKind::*;

    #[test]
    fn widening_matrix_matches_the_language() {
        assert!(widens_to(SByte, Int));
        assert!(widens_to(Byte, UShort));
        assert!(widens_to(Int, Long));
        assert!(widens_to(UInt, ULong));
        assert!(widens_to(Char, UShort));
        assert!(widens_to(Float, Double));
        assert!(widens_to(ULong, Double));

        // Asymmetry.
        assert!(!widens_to(Long, Int));
        assert!(!widens_to(Double, Float));
        assert!(!widens_to(Int, UInt));
        assert!(!widens_to(ULong, Long));

        // Char is a one-way source.
        assert!(!widens_to(UShort, Char));
        assert!(!widens_to(Char, Short));
        assert!(!widens_to(Char, SByte));
        assert!(!widens_to(Char, Byte));

        // Signed sources never widen to unsigned targets.
        assert!(!widens_to(SByte, UShort));
        assert!(!widens_to(Short, UInt));
    }

    #[test]
    fn every_implicit_widening_is_also_explicit() {
        // The explicit table is "every pair"; it suffices that widens_to
        // never names a pair outside the numeric kinds.
        for from in PrimitiveKind::ALL.into_iter().filter(|k| k.is_numeric()) {
            for to in PrimitiveKind::ALL.into_iter().filter(|k| k.is_numeric()) {
                if widens_to(from, to) {
                    assert_ne!(from, to, "identity is not a widening");
                }
            }
        }
    }

    #[test]
    fn unsigned_to_real_needs_the_reinterpret_step() {
        assert!(is_unsigned_to_real(UInt, Float));
        assert!(is_unsigned_to_real(ULong, Double));
        assert!(!is_unsigned_to_real(Int, Float));
        assert!(!is_unsigned_to_real(Byte, Double));
    }
}
