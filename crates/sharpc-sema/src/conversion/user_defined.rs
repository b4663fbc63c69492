//! User-defined conversion operator resolution.
//!
//! Candidates are gathered from both the source and the target type (an
//! operator may live on either side), filtered by standard-conversion
//! reachability, then narrowed to the unique candidate whose parameter and
//! return types are the most specific source and target types. Two equally
//! specific candidates are a genuine ambiguity, never resolved by
//! declaration order.
//!
//! Lookups are memoized per (source, target) pair and direction. Constant
//! sources bypass the cache entirely: a constant's convertibility can
//! depend on its value.

use sharpc_core::{CastKind, CompilationError, Expr, OperatorEntry, TypeHash, corlib, primitives};

use crate::ConversionContext;
use crate::conversion::explicit::explicit_standard;
use crate::conversion::{implicit_standard_conversion, implicit_standard_exists_types};
use crate::overload;

/// Resolve and apply a user-defined conversion from `expr` to `target`.
/// With `explicit` set, `operator explicit` declarations join the
/// candidate set and standard conversions on the way in and out may
/// narrow.
pub(crate) fn user_defined_conversion(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
    explicit: bool,
) -> Result<Option<Expr>, CompilationError> {
    let source = expr.ty;

    // Historical compatibility carve-outs, preserved as named special
    // cases. UIntPtr -> uint is refused outright even though corlib
    // declares the operator; the other two retarget the lookup and let the
    // standard conversion on the way out cover the difference.
    if source == corlib::UINTPTR && target == primitives::UINT {
        return Ok(None);
    }
    let lookup_target = if source == corlib::INTPTR && target == primitives::UINT {
        primitives::INT
    } else if source == corlib::UINTPTR && target == primitives::LONG {
        primitives::ULONG
    } else {
        target
    };

    let is_constant = expr.as_constant().is_some();
    if !is_constant
        && let Some(cached) = ctx.cache_get(explicit, (source, lookup_target))
    {
        return match cached {
            Some(op) => build_user_call(ctx, expr, op, target, explicit),
            None => lifted_retry(ctx, expr, target, explicit),
        };
    }

    let resolved = resolve_operator(ctx, expr, lookup_target, explicit)?;
    if !is_constant {
        ctx.cache_put(explicit, (source, lookup_target), resolved);
    }
    match resolved {
        Some(op) => build_user_call(ctx, expr, op, target, explicit),
        None => lifted_retry(ctx, expr, target, explicit),
    }
}

/// One full candidate scan: gather, filter, tie-break.
fn resolve_operator(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
    explicit: bool,
) -> Result<Option<TypeHash>, CompilationError> {
    ctx.record_scan();
    let reg = ctx.registry();

    let mut candidates: Vec<OperatorEntry> = Vec::new();
    for side in [expr.ty, target] {
        for op in reg.conversion_operators(side, explicit) {
            if !candidates.iter().any(|c| c.hash == op.hash) {
                candidates.push(op.clone());
            }
        }
    }

    candidates.retain(|op| {
        let src_ok = expr.ty == op.param
            || implicit_standard_conversion(ctx, expr, op.param).is_some()
            || (explicit && implicit_standard_exists_types(ctx, op.param, expr.ty));
        let tgt_ok = op.ret == target
            || implicit_standard_exists_types(ctx, op.ret, target)
            || (explicit && implicit_standard_exists_types(ctx, target, op.ret));
        src_ok && tgt_ok
    });
    if candidates.is_empty() {
        return Ok(None);
    }

    let Some(sx) = overload::most_specific_source(ctx, &candidates, expr, explicit) else {
        return Ok(None);
    };
    let Some(tx) = overload::most_specific_target(ctx, &candidates, target, explicit) else {
        return Ok(None);
    };

    let matching: Vec<&OperatorEntry> = candidates
        .iter()
        .filter(|op| op.param == sx && op.ret == tx)
        .collect();
    match matching.as_slice() {
        [] => Ok(None),
        [one] => Ok(Some(one.hash)),
        _ => Err(CompilationError::AmbiguousUserConversion {
            from: ctx.type_name(expr.ty),
            to: ctx.type_name(target),
            span: expr.span,
        }),
    }
}

/// Convert the source to the operator's exact parameter type, wrap the
/// call, and convert the result to the requested target. A silent failure
/// of either standard conversion fails the whole user conversion.
fn build_user_call(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    op_hash: TypeHash,
    target: TypeHash,
    explicit: bool,
) -> Result<Option<Expr>, CompilationError> {
    let op = ctx
        .registry()
        .operator(op_hash)
        .cloned()
        .ok_or_else(|| CompilationError::Internal {
            message: format!("cached conversion operator {op_hash} not in registry"),
        })?;

    let arg = if expr.ty == op.param {
        expr.clone()
    } else if explicit {
        match explicit_standard(ctx, expr, op.param).ok().flatten() {
            Some(e) => e,
            None => return Ok(None),
        }
    } else {
        match implicit_standard_conversion(ctx, expr, op.param) {
            Some(e) => e,
            None => return Ok(None),
        }
    };

    let call = Expr::cast(CastKind::UserOperator(op.hash), op.ret, arg);
    if call.ty == target {
        return Ok(Some(call));
    }
    let out = if explicit {
        explicit_standard(ctx, &call, target).ok().flatten()
    } else {
        implicit_standard_conversion(ctx, &call, target)
    };
    Ok(out)
}

/// Nullable fallback: unwrap a nullable source, reduce a nullable target
/// to its underlying type, recurse, and re-lift the result.
fn lifted_retry(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
    explicit: bool,
) -> Result<Option<Expr>, CompilationError> {
    let reg = ctx.registry();
    let s_under = reg.nullable_underlying(expr.ty);
    let t_under = reg.nullable_underlying(target);
    if s_under.is_none() && t_under.is_none() {
        return Ok(None);
    }

    let inner_expr = match s_under {
        Some(u) => Expr::cast(CastKind::UnwrapNullable, u, expr.clone()),
        None => expr.clone(),
    };
    let inner_target = t_under.unwrap_or(target);
    let Some(converted) = user_defined_conversion(ctx, &inner_expr, inner_target, explicit)? else {
        return Ok(None);
    };

    if t_under.is_some() {
        let combinator = if s_under.is_some() {
            CastKind::Lifted
        } else {
            CastKind::WrapNullable
        };
        return Ok(Some(Expr::cast(combinator, target, converted)));
    }
    // A nullable source only reaches a non-nullable target implicitly when
    // the target is a reference type.
    if !explicit && !reg.is_reference_type(target) {
        return Ok(None);
    }
    Ok(Some(converted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpc_core::{ClassEntry, Constant, Span, StructEntry};
    use sharpc_registry::SymbolRegistry;

    fn money_registry() -> (SymbolRegistry, TypeHash) {
        let mut registry = SymbolRegistry::with_corlib();
        let money = registry.register(StructEntry::new("Money"));
        registry.register_operator(OperatorEntry::implicit(money, primitives::INT, money));
        registry.register_operator(OperatorEntry::implicit(money, money, primitives::DOUBLE));
        registry.register_operator(OperatorEntry::explicit(money, money, primitives::INT));
        (registry, money)
    }

    #[test]
    fn operator_on_the_target_side_is_found() {
        let (registry, money) = money_registry();
        let ctx = ConversionContext::new(&registry);
        let int_expr = Expr::probe(primitives::INT);
        let converted = user_defined_conversion(&ctx, &int_expr, money, false)
            .unwrap()
            .unwrap();
        assert!(matches!(converted.as_cast(), Some((CastKind::UserOperator(_), _))));
        assert_eq!(converted.ty, money);
    }

    #[test]
    fn widening_reaches_the_parameter_type() {
        let (registry, money) = money_registry();
        let ctx = ConversionContext::new(&registry);
        // short widens to int, the operator parameter.
        let short_expr = Expr::probe(primitives::SHORT);
        let converted = user_defined_conversion(&ctx, &short_expr, money, false)
            .unwrap()
            .unwrap();
        let (kind, inner) = converted.as_cast().unwrap();
        assert!(matches!(kind, CastKind::UserOperator(_)));
        assert!(matches!(inner.as_cast(), Some((CastKind::NumericWiden { .. }, _))));
    }

    #[test]
    fn explicit_operator_needs_explicit_mode() {
        let (registry, money) = money_registry();
        let ctx = ConversionContext::new(&registry);
        let money_expr = Expr::probe(money);
        assert!(
            user_defined_conversion(&ctx, &money_expr, primitives::INT, false)
                .unwrap()
                .is_none()
        );
        assert!(
            user_defined_conversion(&ctx, &money_expr, primitives::INT, true)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn equally_specific_candidates_are_ambiguous() {
        let mut registry = SymbolRegistry::with_corlib();
        let from = registry.register(ClassEntry::new("From"));
        let to = registry.register(ClassEntry::new("To"));
        registry.register_operator(OperatorEntry::implicit(from, from, to));
        registry.register_operator(OperatorEntry::implicit(to, from, to));
        let ctx = ConversionContext::new(&registry);
        let err = user_defined_conversion(&ctx, &Expr::probe(from), to, false).unwrap_err();
        assert!(matches!(err, CompilationError::AmbiguousUserConversion { .. }));
    }

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let (registry, money) = money_registry();
        let ctx = ConversionContext::new(&registry);
        let int_expr = Expr::probe(primitives::INT);
        user_defined_conversion(&ctx, &int_expr, money, false).unwrap();
        let scans = ctx.operator_scans();
        user_defined_conversion(&ctx, &int_expr, money, false).unwrap();
        user_defined_conversion(&ctx, &int_expr, money, false).unwrap();
        assert_eq!(ctx.operator_scans(), scans);
    }

    #[test]
    fn constants_bypass_the_cache() {
        let (registry, money) = money_registry();
        let ctx = ConversionContext::new(&registry);
        let three = Expr::constant(Constant::Int(3), Span::default());
        user_defined_conversion(&ctx, &three, money, false).unwrap();
        let scans = ctx.operator_scans();
        user_defined_conversion(&ctx, &three, money, false).unwrap();
        assert!(ctx.operator_scans() > scans);
    }

    #[test]
    fn lifted_retry_wraps_the_result() {
        let (mut registry, money) = money_registry();
        let nullable_money = registry.register_nullable(money);
        let ctx = ConversionContext::new(&registry);
        let int_expr = Expr::probe(primitives::INT);
        let lifted = user_defined_conversion(&ctx, &int_expr, nullable_money, false)
            .unwrap()
            .unwrap();
        let (kind, inner) = lifted.as_cast().unwrap();
        assert!(matches!(kind, CastKind::WrapNullable));
        assert!(matches!(inner.as_cast(), Some((CastKind::UserOperator(_), _))));
    }

    #[test]
    fn uintptr_to_uint_is_refused() {
        let registry = SymbolRegistry::with_corlib();
        let ctx = ConversionContext::new(&registry);
        let expr = Expr::probe(corlib::UINTPTR);
        assert!(
            user_defined_conversion(&ctx, &expr, primitives::UINT, true)
                .unwrap()
                .is_none()
        );
        // The sibling widths still convert.
        assert!(
            user_defined_conversion(&ctx, &expr, primitives::ULONG, true)
                .unwrap()
                .is_some()
        );
    }
}
