//! Conversion resolution.
//!
//! The implicit standard cascade tries each conversion family in language
//! order: identity, null literal, nullable lifting, numeric widening,
//! reference conversions, boxing, constant-expression conversions, then
//! the pointer and `__arglist` special cases. User-defined operators sit
//! behind the standard cascade in the public entry points.
//!
//! Builders are the single source of truth: an existence probe is a
//! builder call on a hypothetical value whose result is discarded, so the
//! two can never disagree.

use sharpc_core::{CastKind, CompilationError, Constant, Expr, TypeHash, corlib, primitives};

use crate::ConversionContext;

pub(crate) mod boxing;
pub(crate) mod explicit;
pub(crate) mod nullable;
pub(crate) mod numeric;
pub(crate) mod reference;
pub(crate) mod user_defined;

pub use numeric::is_unsigned_to_real;

/// Implicit standard conversion: everything the language converts
/// silently, minus user-defined operators.
pub fn implicit_standard_conversion(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Option<Expr> {
    let reg = ctx.registry();
    let source = expr.ty;

    // Identity. The binding pseudo-types are never identical to themselves;
    // a null literal, method group, or anonymous function only has a type
    // once it converts to one.
    if source == target
        && !matches!(
            source,
            corlib::NULL | corlib::METHOD_GROUP | corlib::ANON_METHOD
        )
    {
        return Some(expr.clone());
    }

    if expr.is_null_literal() || source == corlib::NULL {
        if reg.is_nullable(target) {
            return Some(Expr::cast(CastKind::LiftedNull, target, expr.clone()));
        }
        if reg.is_reference_type(target) {
            return Some(Expr::cast(CastKind::NullRef, target, expr.clone()));
        }
        if ctx.unsafe_allowed() && is_pointer_like(ctx, target) {
            return Some(Expr::cast(CastKind::NullRef, target, expr.clone()));
        }
        return None;
    }

    // Nullable targets absorb everything below: no other implicit family
    // produces a nullable value.
    if reg.is_nullable(target) {
        return nullable::implicit_nullable(ctx, expr, target);
    }

    if let Some(n) = numeric::implicit_numeric(expr, target) {
        return Some(n);
    }
    if let Some(r) = reference::implicit_reference(ctx, expr, target) {
        return Some(r);
    }
    if let Some(b) = boxing::implicit_box(ctx, expr, target) {
        return Some(b);
    }

    if let Some(c) = expr.as_constant() {
        if let Some(folded) = numeric::implicit_constant(expr, target) {
            return Some(folded);
        }
        // The literal zero names the zero member of any enum.
        if *c == Constant::Int(0) && reg.is_enum(target) {
            return Some(Expr::cast(CastKind::Identity, target, expr.clone()));
        }
    }

    // Any pointer converts to void* in an unsafe context.
    if ctx.unsafe_allowed()
        && target == TypeHash::pointer_to(primitives::VOID)
        && reg.is_pointer(source)
    {
        return Some(Expr::cast(CastKind::PointerCast, target, expr.clone()));
    }

    // An __arglist access is only usable as an ArgIterator.
    if source == corlib::ARG_LIST && target == corlib::ARG_ITERATOR {
        return Some(Expr::cast(CastKind::Identity, target, expr.clone()));
    }

    None
}

/// Existence probe for the implicit standard conversion of an expression.
pub fn implicit_standard_conversion_exists(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> bool {
    implicit_standard_conversion(ctx, expr, target).is_some()
}

/// Existence probe between two types, using a hypothetical non-constant
/// value of the source type.
pub(crate) fn implicit_standard_exists_types(
    ctx: &ConversionContext<'_>,
    source: TypeHash,
    target: TypeHash,
) -> bool {
    source == target
        || implicit_standard_conversion(ctx, &Expr::probe(source), target).is_some()
}

/// Full implicit conversion: the standard cascade, then user-defined
/// implicit operators. `Err` means resolution itself failed (ambiguity or
/// a checked constant overflow), not that no conversion exists.
pub fn implicit_conversion(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Result<Option<Expr>, CompilationError> {
    if let Some(e) = implicit_standard_conversion(ctx, expr, target) {
        return Ok(Some(e));
    }
    user_defined::user_defined_conversion(ctx, expr, target, false)
}

pub fn implicit_conversion_exists(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> bool {
    matches!(implicit_conversion(ctx, expr, target), Ok(Some(_)))
}

/// Implicit conversion that must succeed. A `dynamic` source defers to a
/// runtime binder node; everything else failing picks the diagnostic by
/// whether a cast would have worked.
pub fn implicit_conversion_required(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Result<Expr, CompilationError> {
    if expr.ty == corlib::DYNAMIC && target != corlib::DYNAMIC {
        return Ok(Expr::cast(CastKind::Dynamic, target, expr.clone()));
    }
    if let Some(e) = implicit_conversion(ctx, expr, target)? {
        return Ok(e);
    }
    let quiet_cast = explicit::explicit_cascade(ctx, expr, target, true)
        .ok()
        .flatten()
        .is_some();
    if quiet_cast {
        return Err(CompilationError::NeedsExplicitCast {
            from: ctx.type_name(expr.ty),
            to: ctx.type_name(target),
            span: expr.span,
        });
    }
    Err(CompilationError::CannotConvert {
        from: ctx.type_name(expr.ty),
        to: ctx.type_name(target),
        span: expr.span,
    })
}

/// Explicit conversion (a source-level cast). Must produce a node or a
/// diagnostic.
pub fn explicit_conversion(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Result<Expr, CompilationError> {
    // A cast to float or double of an expression already of that type
    // still truncates excess intermediate precision, so it survives as a
    // same-width conversion node. Constants carry no excess precision.
    if expr.ty == target
        && (target == primitives::FLOAT || target == primitives::DOUBLE)
        && expr.as_constant().is_none()
        && let Some(k) = numeric::numeric_kind(target)
    {
        return Ok(Expr::cast(
            CastKind::NumericWiden { from: k, to: k },
            target,
            expr.clone(),
        ));
    }

    if let Some(e) = explicit::explicit_cascade(ctx, expr, target, true)? {
        return Ok(e);
    }

    let reg = ctx.registry();
    if !ctx.unsafe_allowed()
        && (reg.is_pointer(expr.ty) || is_pointer_like(ctx, target))
    {
        return Err(CompilationError::UnsafeRequired { span: expr.span });
    }
    Err(CompilationError::CannotCast {
        from: ctx.type_name(expr.ty),
        to: ctx.type_name(target),
        span: expr.span,
    })
}

/// Explicit conversion without user-defined operators.
pub fn explicit_standard_conversion(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Result<Option<Expr>, CompilationError> {
    explicit::explicit_standard(ctx, expr, target)
}

fn is_pointer_like(ctx: &ConversionContext<'_>, ty: TypeHash) -> bool {
    ctx.registry().is_pointer(ty) || ty == TypeHash::pointer_to(primitives::VOID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolveFlags;
    use sharpc_core::{ClassEntry, EnumEntry, Span};
    use sharpc_registry::SymbolRegistry;

    #[test]
    fn identity_returns_the_expression_unchanged() {
        let registry = SymbolRegistry::with_corlib();
        let ctx = ConversionContext::new(&registry);
        let expr = Expr::probe(primitives::INT);
        let converted = implicit_standard_conversion(&ctx, &expr, primitives::INT).unwrap();
        assert_eq!(converted, expr);
    }

    #[test]
    fn null_converts_to_references_and_nullables_only() {
        let mut registry = SymbolRegistry::with_corlib();
        let nullable_int = registry.register_nullable(primitives::INT);
        let ctx = ConversionContext::new(&registry);
        let null = Expr::null(Span::default());

        let as_string = implicit_standard_conversion(&ctx, &null, corlib::STRING).unwrap();
        assert!(matches!(as_string.as_cast(), Some((CastKind::NullRef, _))));

        let as_nullable = implicit_standard_conversion(&ctx, &null, nullable_int).unwrap();
        assert!(matches!(as_nullable.as_cast(), Some((CastKind::LiftedNull, _))));

        assert!(implicit_standard_conversion(&ctx, &null, primitives::INT).is_none());
    }

    #[test]
    fn unbound_function_expressions_have_no_identity_conversion() {
        let registry = SymbolRegistry::with_corlib();
        let ctx = ConversionContext::new(&registry);
        for ty in [corlib::METHOD_GROUP, corlib::ANON_METHOD] {
            let expr = Expr::probe(ty);
            assert!(implicit_standard_conversion(&ctx, &expr, ty).is_none());
            // Delegate binding lives with the expression layer; the
            // cascade itself refuses these sources.
            let err = implicit_conversion_required(&ctx, &expr, corlib::STRING).unwrap_err();
            assert!(matches!(err, CompilationError::CannotConvert { .. }));
        }
    }

    #[test]
    fn literal_zero_names_any_enum() {
        let mut registry = SymbolRegistry::with_corlib();
        let color = registry.register(EnumEntry::new("Color"));
        let ctx = ConversionContext::new(&registry);

        let zero = Expr::constant(Constant::Int(0), Span::default());
        assert!(implicit_standard_conversion(&ctx, &zero, color).is_some());

        let one = Expr::constant(Constant::Int(1), Span::default());
        assert!(implicit_standard_conversion(&ctx, &one, color).is_none());
    }

    #[test]
    fn arglist_reaches_only_arg_iterator() {
        let registry = SymbolRegistry::with_corlib();
        let ctx = ConversionContext::new(&registry);
        let arglist = Expr::arglist(Span::default());
        assert!(implicit_standard_conversion(&ctx, &arglist, corlib::ARG_ITERATOR).is_some());
        assert!(implicit_standard_conversion(&ctx, &arglist, corlib::OBJECT).is_none());
    }

    #[test]
    fn any_pointer_reaches_void_star_in_unsafe_context() {
        let mut registry = SymbolRegistry::with_corlib();
        let int_ptr = registry.register_pointer(primitives::INT);
        let void_ptr = registry.register_pointer(primitives::VOID);

        let safe = ConversionContext::new(&registry);
        assert!(implicit_standard_conversion(&safe, &Expr::probe(int_ptr), void_ptr).is_none());

        let unsafe_ctx = ConversionContext::with_flags(&registry, ResolveFlags::UNSAFE);
        let cast = implicit_standard_conversion(&unsafe_ctx, &Expr::probe(int_ptr), void_ptr);
        assert!(matches!(
            cast.as_ref().and_then(|e| e.as_cast()),
            Some((CastKind::PointerCast, _))
        ));
    }

    #[test]
    fn dynamic_sources_defer_to_runtime() {
        let registry = SymbolRegistry::with_corlib();
        let ctx = ConversionContext::new(&registry);
        let dynamic = Expr::probe(corlib::DYNAMIC);
        let node = implicit_conversion_required(&ctx, &dynamic, primitives::INT).unwrap();
        assert!(matches!(node.as_cast(), Some((CastKind::Dynamic, _))));
    }

    #[test]
    fn failed_implicit_picks_the_diagnostic_by_castability() {
        let mut registry = SymbolRegistry::with_corlib();
        let animal = registry.register(ClassEntry::new("Animal"));
        let dog = registry.register(ClassEntry::new("Dog").with_base(animal));
        let ctx = ConversionContext::new(&registry);

        // Downcast exists, so the error suggests a cast.
        let down = implicit_conversion_required(&ctx, &Expr::probe(animal), dog).unwrap_err();
        assert!(matches!(down, CompilationError::NeedsExplicitCast { .. }));

        // No conversion at all.
        let none =
            implicit_conversion_required(&ctx, &Expr::probe(corlib::STRING), primitives::INT)
                .unwrap_err();
        assert!(matches!(none, CompilationError::CannotConvert { .. }));
    }

    #[test]
    fn forced_precision_cast_survives_identity() {
        let registry = SymbolRegistry::with_corlib();
        let ctx = ConversionContext::new(&registry);
        let value = Expr::probe(primitives::DOUBLE);
        let cast = explicit_conversion(&ctx, &value, primitives::DOUBLE).unwrap();
        assert!(matches!(
            cast.as_cast(),
            Some((CastKind::NumericWiden { from, to }, _)) if from == to
        ));

        // A double constant is exact already.
        let c = Expr::constant(Constant::Double(1.5), Span::default());
        let kept = explicit_conversion(&ctx, &c, primitives::DOUBLE).unwrap();
        assert!(kept.as_constant().is_some());
    }

    #[test]
    fn pointer_cast_without_unsafe_reports_unsafe_required() {
        let mut registry = SymbolRegistry::with_corlib();
        let int_ptr = registry.register_pointer(primitives::INT);
        let ctx = ConversionContext::new(&registry);
        let err = explicit_conversion(&ctx, &Expr::probe(primitives::LONG), int_ptr).unwrap_err();
        assert!(matches!(err, CompilationError::UnsafeRequired { .. }));
    }
}
