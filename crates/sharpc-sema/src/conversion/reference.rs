//! Reference conversions, implicit (widening) and explicit (narrowing),
//! including array covariance, the array-to-generic-collection family,
//! type-parameter conversions, and variance-aware generic identity.

use sharpc_core::{CastKind, Expr, TypeEntry, TypeHash, Variance, corlib};

use crate::ConversionContext;

/// Whether an identity or implicit reference conversion exists between two
/// types, probing with a hypothetical value.
pub(crate) fn implicit_ref_exists(
    ctx: &ConversionContext<'_>,
    source: TypeHash,
    target: TypeHash,
) -> bool {
    source == target || implicit_reference(ctx, &Expr::probe(source), target).is_some()
}

fn upcast(expr: &Expr, target: TypeHash) -> Option<Expr> {
    Some(Expr::cast(CastKind::RefUpcast, target, expr.clone()))
}

fn downcast(expr: &Expr, target: TypeHash) -> Option<Expr> {
    Some(Expr::cast(CastKind::RefDowncast { forced: false }, target, expr.clone()))
}

/// Implicit reference conversion, in rule priority order. Boxing cases are
/// not handled here; the cascade tries them next.
pub(crate) fn implicit_reference(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Option<Expr> {
    let reg = ctx.registry();
    let source = expr.ty;

    // Null literal to any reference target (pointers take the unsafe path
    // in the cascade).
    if expr.is_null_literal() || source == corlib::NULL {
        if reg.is_reference_type(target) {
            return Some(Expr::cast(CastKind::NullRef, target, expr.clone()));
        }
        return None;
    }

    // Type parameters convert through their effective base class and
    // interface constraints; whether that is a reference cast or boxing
    // depends on the reference constraint.
    if let Some(TypeEntry::TypeParam(tp)) = reg.get(source) {
        let reaches = target == tp.effective_base
            || reg.is_subclass_of(tp.effective_base, target)
            || reg.implements_interface(source, target);
        if reaches {
            let kind = if tp.has_reference_constraint {
                CastKind::RefUpcast
            } else {
                CastKind::Box
            };
            return Some(Expr::cast(kind, target, expr.clone()));
        }
        return None;
    }

    // Interface implemented by a non-value-type source.
    if reg.is_interface(target)
        && !reg.is_value_type(source)
        && reg.implements_interface(source, target)
    {
        return upcast(expr, target);
    }

    // Everything non-value converts to object (and dynamic).
    if (target == corlib::OBJECT || target == corlib::DYNAMIC)
        && !reg.is_value_type(source)
        && !reg.is_pointer(source)
        && (reg.is_reference_type(source) || source == corlib::DYNAMIC)
    {
        return upcast(expr, target);
    }

    // Strict subclass. Enum to System.Enum is boxing, not a reference
    // conversion, and value types reach their abstract bases by boxing too.
    if !reg.is_value_type(source) && reg.is_subclass_of(source, target) {
        return upcast(expr, target);
    }

    // Arrays: the abstract base, covariance, and the single-rank
    // collection-interface family.
    if let Some(TypeEntry::Array(sa)) = reg.get(source) {
        if target == corlib::ARRAY_TYPE {
            return upcast(expr, target);
        }
        if let Some(TypeEntry::Array(ta)) = reg.get(target)
            && sa.rank == ta.rank
            && reg.is_reference_type(sa.element)
            && reg.is_reference_type(ta.element)
            && implicit_ref_exists(ctx, sa.element, ta.element)
        {
            return upcast(expr, target);
        }
        if sa.rank == 1
            && let Some(arg) = collection_interface_arg(ctx, target)
            && (sa.element == arg
                || (reg.is_reference_type(sa.element)
                    && reg.is_reference_type(arg)
                    && implicit_ref_exists(ctx, sa.element, arg)))
        {
            return upcast(expr, target);
        }
    }

    // Interface extension.
    if reg.is_interface(source) && reg.is_interface(target) && reg.interface_extends(source, target)
    {
        return upcast(expr, target);
    }

    // Any delegate type to System.Delegate.
    if reg.is_delegate_type(source) && target == corlib::DELEGATE_TYPE {
        return upcast(expr, target);
    }

    // Generic identity modulo declared variance.
    if variantly_equal(ctx, source, target) {
        return upcast(expr, target);
    }

    None
}

/// The element type when `ty` is an instance of the IList/ICollection/
/// IEnumerable family.
fn collection_interface_arg(ctx: &ConversionContext<'_>, ty: TypeHash) -> Option<TypeHash> {
    let entry = ctx.registry().get(ty)?.as_generic_instance()?;
    matches!(
        entry.template,
        corlib::ILIST | corlib::ICOLLECTION | corlib::IENUMERABLE
    )
    .then(|| entry.args.first().copied())?
}

/// Variance-aware structural equality: same template, and each argument
/// pair identical or related by an implicit reference conversion in the
/// direction the template's variance declares.
pub(crate) fn variantly_equal(ctx: &ConversionContext<'_>, a: TypeHash, b: TypeHash) -> bool {
    if a == b {
        return true;
    }
    let reg = ctx.registry();
    let (Some(ga), Some(gb)) = (
        reg.get(a).and_then(TypeEntry::as_generic_instance),
        reg.get(b).and_then(TypeEntry::as_generic_instance),
    ) else {
        return false;
    };
    if ga.template != gb.template || ga.args.len() != gb.args.len() {
        return false;
    }
    let variance: Vec<Variance> = reg
        .get(ga.template)
        .and_then(TypeEntry::as_interface)
        .map(|e| e.variance.clone())
        .unwrap_or_default();
    ga.args.iter().zip(gb.args.iter()).enumerate().all(|(i, (&x, &y))| {
        match variance.get(i).copied().unwrap_or_default() {
            Variance::Invariant => x == y,
            Variance::Covariant => {
                x == y
                    || (reg.is_reference_type(x)
                        && reg.is_reference_type(y)
                        && implicit_ref_exists(ctx, x, y))
            }
            Variance::Contravariant => {
                x == y
                    || (reg.is_reference_type(x)
                        && reg.is_reference_type(y)
                        && implicit_ref_exists(ctx, y, x))
            }
        }
    })
}

/// Whether an identity, implicit, or explicit reference conversion exists.
pub(crate) fn explicit_ref_exists(
    ctx: &ConversionContext<'_>,
    source: TypeHash,
    target: TypeHash,
) -> bool {
    source == target
        || implicit_ref_exists(ctx, source, target)
        || explicit_reference(ctx, &Expr::probe(source), target).is_some()
}

/// Explicit (narrowing) reference conversion: the adjoint of the implicit
/// rules. Downcasts are runtime-checked; extractions of boxed value types
/// become unbox nodes.
pub(crate) fn explicit_reference(
    ctx: &ConversionContext<'_>,
    expr: &Expr,
    target: TypeHash,
) -> Option<Expr> {
    let reg = ctx.registry();
    let source = expr.ty;

    // object (and dynamic) narrows to anything: unbox for value types and
    // type parameters, checked class cast for references.
    if source == corlib::OBJECT || source == corlib::DYNAMIC {
        if reg.is_value_type(target) || reg.is_generic_parameter(target) {
            return Some(Expr::cast(CastKind::Unbox, target, expr.clone()));
        }
        if reg.is_reference_type(target) {
            return downcast(expr, target);
        }
        return None;
    }

    // The abstract value-type bases unbox to their members.
    if source == corlib::VALUE_TYPE && reg.is_value_type(target) {
        return Some(Expr::cast(CastKind::Unbox, target, expr.clone()));
    }
    if source == corlib::ENUM_TYPE && reg.is_enum(target) {
        return Some(Expr::cast(CastKind::Unbox, target, expr.clone()));
    }

    // A type parameter narrows to anything below its effective base, and to
    // any interface its constraints do not already guarantee. The static
    // types never relate, so the downcast keeps its runtime check.
    if let Some(TypeEntry::TypeParam(tp)) = reg.get(source) {
        if reg.is_interface(target) && !reg.implements_interface(source, target) {
            return Some(Expr::cast(CastKind::RefDowncast { forced: true }, target, expr.clone()));
        }
        if reg.is_subclass_of(target, tp.effective_base) {
            if reg.is_value_type(target) {
                return Some(Expr::cast(CastKind::Unbox, target, expr.clone()));
            }
            if reg.is_reference_type(target) {
                return Some(Expr::cast(
                    CastKind::RefDowncast { forced: true },
                    target,
                    expr.clone(),
                ));
            }
        }
        return None;
    }

    // Base to derived.
    if reg.is_reference_type(target) && reg.is_subclass_of(target, source) {
        return downcast(expr, target);
    }

    if reg.is_interface(source) {
        // Interface to a class that could implement it: any non-sealed
        // class, or a sealed one that actually does.
        if reg.is_value_type(target) && reg.implements_interface(target, source) {
            return Some(Expr::cast(CastKind::Unbox, target, expr.clone()));
        }
        if reg.is_interface(target) {
            // Interface to unrelated or narrower interface.
            if !reg.interface_extends(source, target) {
                return downcast(expr, target);
            }
            return None;
        }
        if reg.is_reference_type(target)
            && (!reg.is_sealed(target) || reg.implements_interface(target, source))
        {
            return downcast(expr, target);
        }
        // Collection-interface family back to a single-rank array.
        if let Some(arg) = collection_interface_arg(ctx, source)
            && let Some(TypeEntry::Array(ta)) = reg.get(target)
            && ta.rank == 1
            && (ta.element == arg || explicit_ref_exists(ctx, arg, ta.element))
        {
            return downcast(expr, target);
        }
        return None;
    }

    // Non-sealed class to an interface it does not implement.
    if reg.is_interface(target)
        && reg.is_reference_type(source)
        && !reg.is_sealed(source)
        && !reg.implements_interface(source, target)
    {
        return downcast(expr, target);
    }

    // Arrays: element narrowing at equal rank, and System.Array downward.
    if let Some(TypeEntry::Array(sa)) = reg.get(source)
        && let Some(TypeEntry::Array(ta)) = reg.get(target)
        && sa.rank == ta.rank
        && reg.is_reference_type(sa.element)
        && reg.is_reference_type(ta.element)
        && explicit_ref_exists(ctx, sa.element, ta.element)
    {
        return downcast(expr, target);
    }
    if source == corlib::ARRAY_TYPE && matches!(reg.get(target), Some(TypeEntry::Array(_))) {
        return downcast(expr, target);
    }

    // System.Delegate downward.
    if source == corlib::DELEGATE_TYPE && reg.is_delegate_type(target) {
        return downcast(expr, target);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpc_core::{
        ArrayEntry, ClassEntry, DelegateEntry, InterfaceEntry, TypeParamEntry, primitives,
    };
    use sharpc_registry::SymbolRegistry;

    fn setup() -> SymbolRegistry {
        let mut registry = SymbolRegistry::with_corlib();
        registry.register(ArrayEntry::new(corlib::STRING, 1));
        registry.register(ArrayEntry::new(corlib::OBJECT, 1));
        registry.register(ArrayEntry::new(primitives::INT, 1));
        registry
    }

    #[test]
    fn string_array_covariance() {
        let registry = setup();
        let ctx = ConversionContext::new(&registry);
        let strings = Expr::probe(TypeHash::array_of(corlib::STRING, 1));
        let objects = TypeHash::array_of(corlib::OBJECT, 1);
        let converted = implicit_reference(&ctx, &strings, objects).unwrap();
        assert!(matches!(converted.as_cast(), Some((CastKind::RefUpcast, _))));
    }

    #[test]
    fn value_element_arrays_are_not_covariant() {
        let registry = setup();
        let ctx = ConversionContext::new(&registry);
        let ints = Expr::probe(TypeHash::array_of(primitives::INT, 1));
        let objects = TypeHash::array_of(corlib::OBJECT, 1);
        assert!(implicit_reference(&ctx, &ints, objects).is_none());
    }

    #[test]
    fn single_rank_array_reaches_the_collection_family() {
        let mut registry = setup();
        let list_str = registry.register_instance(corlib::ILIST, vec![corlib::STRING]);
        let seq_obj = registry.register_instance(corlib::IENUMERABLE, vec![corlib::OBJECT]);
        let list_int = registry.register_instance(corlib::ILIST, vec![primitives::INT]);
        registry.register(ArrayEntry::new(corlib::STRING, 2));
        let ctx = ConversionContext::new(&registry);

        let strings = Expr::probe(TypeHash::array_of(corlib::STRING, 1));
        assert!(implicit_reference(&ctx, &strings, list_str).is_some());
        assert!(implicit_reference(&ctx, &strings, seq_obj).is_some());

        // Identity of the element type qualifies even for value elements.
        let ints = Expr::probe(TypeHash::array_of(primitives::INT, 1));
        assert!(implicit_reference(&ctx, &ints, list_int).is_some());

        // Rank two never qualifies.
        let grid = Expr::probe(TypeHash::array_of(corlib::STRING, 2));
        assert!(implicit_reference(&ctx, &grid, list_str).is_none());
    }

    #[test]
    fn delegates_reach_system_delegate() {
        let mut registry = setup();
        let action = registry.register(DelegateEntry::new("Action"));
        let ctx = ConversionContext::new(&registry);
        let expr = Expr::probe(action);
        assert!(implicit_reference(&ctx, &expr, corlib::DELEGATE_TYPE).is_some());
        // And back down only explicitly.
        let del = Expr::probe(corlib::DELEGATE_TYPE);
        assert!(implicit_reference(&ctx, &del, action).is_none());
        assert!(explicit_reference(&ctx, &del, action).is_some());
    }

    #[test]
    fn covariant_instances_widen_their_argument() {
        let mut registry = setup();
        let seq_str = registry.register_instance(corlib::IENUMERABLE, vec![corlib::STRING]);
        let seq_obj = registry.register_instance(corlib::IENUMERABLE, vec![corlib::OBJECT]);
        let list_str = registry.register_instance(corlib::ILIST, vec![corlib::STRING]);
        let list_obj = registry.register_instance(corlib::ILIST, vec![corlib::OBJECT]);
        let ctx = ConversionContext::new(&registry);
        assert!(variantly_equal(&ctx, seq_str, seq_obj));
        assert!(!variantly_equal(&ctx, seq_obj, seq_str));
        // IList is invariant.
        assert!(!variantly_equal(&ctx, list_str, list_obj));
    }

    #[test]
    fn type_parameters_narrow_below_their_effective_base() {
        let mut registry = setup();
        let unconstrained = registry.register(TypeParamEntry::new("T"));
        let marker = registry.register(InterfaceEntry::new("IMarker"));
        let shape = registry.register(ClassEntry::new("Shape"));
        let circle = registry.register(ClassEntry::new("Circle").with_base(shape));
        let bounded = registry.register(TypeParamEntry::new("U").with_base(shape));
        let ctx = ConversionContext::new(&registry);

        // Unconstrained T reaches any class or value type, only explicitly.
        let t = Expr::probe(unconstrained);
        assert!(implicit_reference(&ctx, &t, corlib::STRING).is_none());
        let down = explicit_reference(&ctx, &t, corlib::STRING).unwrap();
        assert!(matches!(
            down.as_cast(),
            Some((CastKind::RefDowncast { forced: true }, _))
        ));
        let unboxed = explicit_reference(&ctx, &t, primitives::INT).unwrap();
        assert!(matches!(unboxed.as_cast(), Some((CastKind::Unbox, _))));
        // Interfaces outside the constraints keep the runtime check.
        assert!(explicit_reference(&ctx, &t, marker).is_some());

        // A base constraint bounds the reachable set.
        let u = Expr::probe(bounded);
        assert!(explicit_reference(&ctx, &u, circle).is_some());
        assert!(explicit_reference(&ctx, &u, corlib::STRING).is_none());
    }

    #[test]
    fn interface_downcasts_respect_sealing() {
        let mut registry = setup();
        let marker = registry.register(InterfaceEntry::new("IMarker"));
        let open = registry.register(ClassEntry::new("Open"));
        let sealed = registry.register(ClassEntry::new("Shut").sealed());
        let sealed_impl =
            registry.register(ClassEntry::new("ShutImpl").with_interface(marker).sealed());
        let ctx = ConversionContext::new(&registry);
        let iface = Expr::probe(marker);
        assert!(explicit_reference(&ctx, &iface, open).is_some());
        assert!(explicit_reference(&ctx, &iface, sealed).is_none());
        assert!(explicit_reference(&ctx, &iface, sealed_impl).is_some());
    }
}
