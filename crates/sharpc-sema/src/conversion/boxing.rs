//! Boxing conversions: value types wrapped as references.
//!
//! The box node appends a box operation after evaluating its child; the
//! matching unbox node (built by the explicit rules) performs a checked
//! extraction and must trap at runtime when the boxed type disagrees.

use sharpc_core::{CastKind, Expr, TypeHash, corlib};

use crate::ConversionContext;

/// Implicit boxing conversion. Type-parameter boxing is handled with the
/// reference rules, where the identity-versus-box decision lives.
pub(crate) fn implicit_box(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Option<Expr> {
    let reg = ctx.registry();
    let source = expr.ty;
    if reg.is_pointer(source) {
        return None;
    }

    // Nullable of an enum reaches System.Enum by unwrapping first.
    if target == corlib::ENUM_TYPE
        && let Some(underlying) = reg.nullable_underlying(source)
        && reg.is_enum(underlying)
    {
        let unwrapped = Expr::cast(CastKind::UnwrapNullable, underlying, expr.clone());
        return Some(Expr::cast(CastKind::Box, target, unwrapped));
    }

    if !reg.is_value_type(source) {
        return None;
    }

    if target == corlib::OBJECT || target == corlib::DYNAMIC || target == corlib::VALUE_TYPE {
        return Some(Expr::cast(CastKind::Box, target, expr.clone()));
    }
    if target == corlib::ENUM_TYPE && reg.is_enum(source) {
        return Some(Expr::cast(CastKind::Box, target, expr.clone()));
    }
    if reg.is_interface(target) && reg.implements_interface(source, target) {
        return Some(Expr::cast(CastKind::Box, target, expr.clone()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpc_core::{EnumEntry, InterfaceEntry, StructEntry, primitives};
    use sharpc_registry::SymbolRegistry;

    #[test]
    fn value_types_box_to_their_abstract_bases() {
        let mut registry = SymbolRegistry::with_corlib();
        let color = registry.register(EnumEntry::new("Color"));
        let ctx = ConversionContext::new(&registry);

        let int_expr = Expr::probe(primitives::INT);
        assert!(implicit_box(&ctx, &int_expr, corlib::OBJECT).is_some());
        assert!(implicit_box(&ctx, &int_expr, corlib::VALUE_TYPE).is_some());
        assert!(implicit_box(&ctx, &int_expr, corlib::ENUM_TYPE).is_none());

        let color_expr = Expr::probe(color);
        assert!(implicit_box(&ctx, &color_expr, corlib::ENUM_TYPE).is_some());
        assert!(implicit_box(&ctx, &color_expr, corlib::VALUE_TYPE).is_some());
    }

    #[test]
    fn structs_box_to_implemented_interfaces() {
        let mut registry = SymbolRegistry::with_corlib();
        let fmt = registry.register(InterfaceEntry::new("IFormat"));
        let money = registry.register(StructEntry::new("Money").with_interface(fmt));
        let plain = registry.register(StructEntry::new("Plain"));
        let ctx = ConversionContext::new(&registry);

        assert!(implicit_box(&ctx, &Expr::probe(money), fmt).is_some());
        assert!(implicit_box(&ctx, &Expr::probe(plain), fmt).is_none());
    }

    #[test]
    fn nullable_enum_unwraps_into_system_enum() {
        let mut registry = SymbolRegistry::with_corlib();
        let color = registry.register(EnumEntry::new("Color"));
        let nullable = registry.register_nullable(color);
        let ctx = ConversionContext::new(&registry);

        let boxed = implicit_box(&ctx, &Expr::probe(nullable), corlib::ENUM_TYPE).unwrap();
        let (kind, inner) = boxed.as_cast().unwrap();
        assert!(matches!(kind, CastKind::Box));
        assert!(matches!(inner.as_cast(), Some((CastKind::UnwrapNullable, _))));
    }

    #[test]
    fn references_do_not_box() {
        let registry = SymbolRegistry::with_corlib();
        let ctx = ConversionContext::new(&registry);
        assert!(implicit_box(&ctx, &Expr::probe(corlib::STRING), corlib::OBJECT).is_none());
    }
}
