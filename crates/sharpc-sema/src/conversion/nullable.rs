//! Nullable lifting.
//!
//! Conversions into `Nullable<T>` thread a has-value flag around an
//! underlying identity or numeric conversion: a nullable source unwraps,
//! converts, and re-lifts through the `Lifted` combinator; a non-nullable
//! source converts and wraps. The null literal becomes an empty nullable
//! directly.

use sharpc_core::{CastKind, Expr, TypeHash};

use crate::ConversionContext;
use crate::conversion::implicit_standard_conversion;

/// Implicit conversion into a `Nullable<T>` target.
pub(crate) fn implicit_nullable(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Option<Expr> {
    let reg = ctx.registry();
    let t_under = reg.nullable_underlying(target)?;

    if expr.is_null_literal() {
        return Some(Expr::cast(CastKind::LiftedNull, target, expr.clone()));
    }

    let (unwrapped, was_nullable) = match reg.nullable_underlying(expr.ty) {
        Some(s_under) => (
            Expr::cast(CastKind::UnwrapNullable, s_under, expr.clone()),
            true,
        ),
        None => (expr.clone(), false),
    };

    // The unwrapped value takes any implicit standard conversion to the
    // underlying type; constant sources fold eagerly, including the
    // constant-range rules. The underlying type is never itself nullable,
    // so the recursion bottoms out.
    let converted = if unwrapped.ty == t_under {
        unwrapped
    } else {
        implicit_standard_conversion(ctx, &unwrapped, t_under)?
    };

    let combinator = if was_nullable {
        CastKind::Lifted
    } else {
        CastKind::WrapNullable
    };
    Some(Expr::cast(combinator, target, converted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpc_core::{Constant, Span, primitives};
    use sharpc_registry::SymbolRegistry;

    fn setup() -> SymbolRegistry {
        let mut registry = SymbolRegistry::with_corlib();
        registry.register_nullable(primitives::INT);
        registry.register_nullable(primitives::LONG);
        registry
    }

    #[test]
    fn value_wraps_through_the_underlying_conversion() {
        let registry = setup();
        let ctx = ConversionContext::new(&registry);
        let target = sharpc_core::TypeHash::nullable_of(primitives::LONG);
        let lifted = implicit_nullable(&ctx, &Expr::probe(primitives::INT), target).unwrap();
        let (kind, inner) = lifted.as_cast().unwrap();
        assert!(matches!(kind, CastKind::WrapNullable));
        assert!(matches!(inner.as_cast(), Some((CastKind::NumericWiden { .. }, _))));
    }

    #[test]
    fn null_literal_lifts_to_empty() {
        let registry = setup();
        let ctx = ConversionContext::new(&registry);
        let target = sharpc_core::TypeHash::nullable_of(primitives::INT);
        let lifted = implicit_nullable(&ctx, &Expr::null(Span::default()), target).unwrap();
        assert!(matches!(lifted.as_cast(), Some((CastKind::LiftedNull, _))));
        assert_eq!(lifted.ty, target);
    }

    #[test]
    fn nullable_source_threads_the_flag() {
        let registry = setup();
        let ctx = ConversionContext::new(&registry);
        let source = sharpc_core::TypeHash::nullable_of(primitives::INT);
        let target = sharpc_core::TypeHash::nullable_of(primitives::LONG);
        let lifted = implicit_nullable(&ctx, &Expr::probe(source), target).unwrap();
        let (kind, inner) = lifted.as_cast().unwrap();
        assert!(matches!(kind, CastKind::Lifted));
        // widen(unwrap(source))
        let (inner_kind, unwrapped) = inner.as_cast().unwrap();
        assert!(matches!(inner_kind, CastKind::NumericWiden { .. }));
        assert!(matches!(unwrapped.as_cast(), Some((CastKind::UnwrapNullable, _))));
    }

    #[test]
    fn constants_fold_before_wrapping() {
        let registry = setup();
        let ctx = ConversionContext::new(&registry);
        let target = sharpc_core::TypeHash::nullable_of(primitives::LONG);
        let five = Expr::constant(Constant::Int(5), Span::default());
        let lifted = implicit_nullable(&ctx, &five, target).unwrap();
        let (_, inner) = lifted.as_cast().unwrap();
        assert_eq!(inner.as_constant(), Some(&Constant::Long(5)));
    }

    #[test]
    fn literal_zero_lifts_into_a_nullable_enum() {
        let mut registry = setup();
        let color = registry.register(sharpc_core::EnumEntry::new("Color"));
        let target = registry.register_nullable(color);
        let ctx = ConversionContext::new(&registry);
        let zero = Expr::constant(Constant::Int(0), Span::default());
        let lifted = implicit_nullable(&ctx, &zero, target).unwrap();
        assert!(matches!(lifted.as_cast(), Some((CastKind::WrapNullable, _))));
        assert!(implicit_nullable(&ctx, &Expr::constant(Constant::Int(1), Span::default()), target).is_none());
    }

    #[test]
    fn no_lifting_without_an_underlying_conversion() {
        let registry = setup();
        let ctx = ConversionContext::new(&registry);
        let target = sharpc_core::TypeHash::nullable_of(primitives::INT);
        // long does not implicitly narrow to int, lifted or not.
        assert!(implicit_nullable(&ctx, &Expr::probe(primitives::LONG), target).is_none());
    }
}
