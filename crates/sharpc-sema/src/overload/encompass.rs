//! Most-encompassed / most-encompassing type selection.
//!
//! A type A is encompassed by B when an implicit standard conversion exists
//! from A to B. The most encompassed type of a set is the unique member
//! encompassed by every other member (the "smallest"); the most
//! encompassing type is the unique member that encompasses every other
//! member (the "largest").
//!
//! Both functions run the historical two-pass algorithm: a forward scan
//! picks a candidate best, then a verification pass checks it really
//! dominates every member. The single scan alone does not guarantee a
//! total order, and the verification failing means the set has no unique
//! answer — the caller treats that as ambiguous. Overload selection is
//! specified in terms of exactly this procedure, so it is preserved
//! bit-for-bit rather than replaced with a different partial-order
//! computation.

use sharpc_core::TypeHash;

use crate::ConversionContext;
use crate::conversion::implicit_standard_exists_types;

/// The unique type in `types` that implicitly converts to every other
/// member, or `None` when no such type exists.
pub fn find_most_encompassed(ctx: &ConversionContext<'_>, types: &[TypeHash]) -> Option<TypeHash> {
    let mut iter = types.iter().copied();
    let mut best = iter.next()?;
    for t in iter {
        if t != best && implicit_standard_exists_types(ctx, t, best) {
            best = t;
        }
    }
    for &t in types {
        if t != best && !implicit_standard_exists_types(ctx, best, t) {
            return None;
        }
    }
    Some(best)
}

/// The unique type in `types` that every other member implicitly converts
/// to, or `None` when no such type exists.
pub fn find_most_encompassing(ctx: &ConversionContext<'_>, types: &[TypeHash]) -> Option<TypeHash> {
    let mut iter = types.iter().copied();
    let mut best = iter.next()?;
    for t in iter {
        if t != best && implicit_standard_exists_types(ctx, best, t) {
            best = t;
        }
    }
    for &t in types {
        if t != best && !implicit_standard_exists_types(ctx, t, best) {
            return None;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpc_core::{ClassEntry, primitives};
    use sharpc_registry::SymbolRegistry;

    #[test]
    fn numeric_chain_has_both_ends() {
        let registry = SymbolRegistry::with_corlib();
        let ctx = ConversionContext::new(&registry);
        let set = [primitives::INT, primitives::LONG, primitives::SHORT];
        assert_eq!(find_most_encompassed(&ctx, &set), Some(primitives::SHORT));
        assert_eq!(find_most_encompassing(&ctx, &set), Some(primitives::LONG));
    }

    #[test]
    fn unrelated_types_are_ambiguous() {
        let registry = SymbolRegistry::with_corlib();
        let ctx = ConversionContext::new(&registry);
        // Neither converts to the other.
        let set = [primitives::INT, primitives::UINT];
        assert_eq!(find_most_encompassed(&ctx, &set), None);
    }

    #[test]
    fn class_hierarchy_orders_by_upcast() {
        let mut registry = SymbolRegistry::with_corlib();
        let base = registry.register(ClassEntry::new("Base"));
        let derived = registry.register(ClassEntry::new("Derived").with_base(base));
        let ctx = ConversionContext::new(&registry);
        let set = [base, derived];
        assert_eq!(find_most_encompassed(&ctx, &set), Some(derived));
        assert_eq!(find_most_encompassing(&ctx, &set), Some(base));
    }

    #[test]
    fn verification_rejects_partial_orders() {
        let mut registry = SymbolRegistry::with_corlib();
        let base = registry.register(ClassEntry::new("Base"));
        let left = registry.register(ClassEntry::new("Left").with_base(base));
        let right = registry.register(ClassEntry::new("Right").with_base(base));
        let ctx = ConversionContext::new(&registry);
        // Left and Right share a base but neither encompasses the other.
        assert_eq!(find_most_encompassed(&ctx, &[left, right]), None);
        assert_eq!(find_most_encompassing(&ctx, &[left, right]), None);
        // Adding the base gives the encompassing end an answer.
        assert_eq!(
            find_most_encompassing(&ctx, &[left, right, base]),
            Some(base)
        );
        assert_eq!(find_most_encompassed(&ctx, &[left, right, base]), None);
    }
}
