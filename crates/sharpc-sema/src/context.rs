//! Conversion context: the per-compilation state every engine call runs
//! against.
//!
//! The context borrows the registry, carries the checked/unsafe flags of
//! the enclosing scope, and owns the user-operator lookup cache. Resetting
//! between compilations is constructing a new context; nothing leaks
//! process-wide.

use std::cell::{Cell, RefCell};

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use sharpc_core::TypeHash;
use sharpc_registry::SymbolRegistry;

bitflags! {
    /// Contextual flags of the scope requesting a conversion.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResolveFlags: u8 {
        /// Overflow-checked arithmetic: numeric narrowing traps instead of
        /// truncating, and out-of-range constant casts are compile errors.
        const CHECKED = 1 << 0;
        /// Unsafe scope: pointer conversions are permitted.
        const UNSAFE = 1 << 1;
    }
}

/// Memo of user-operator lookups, keyed by (source, target) and split by
/// direction. Constant sources never touch it: a constant's convertibility
/// depends on its value, not just its type.
#[derive(Default)]
struct ConversionCache {
    implicit: FxHashMap<(TypeHash, TypeHash), Option<TypeHash>>,
    explicit: FxHashMap<(TypeHash, TypeHash), Option<TypeHash>>,
}

/// State for one compilation unit's conversion resolution.
pub struct ConversionContext<'a> {
    registry: &'a SymbolRegistry,
    flags: ResolveFlags,
    cache: RefCell<ConversionCache>,
    scans: Cell<u64>,
}

impl<'a> ConversionContext<'a> {
    /// Create a context with default flags (unchecked, safe).
    pub fn new(registry: &'a SymbolRegistry) -> Self {
        Self::with_flags(registry, ResolveFlags::empty())
    }

    /// Create a context for a scope with the given flags.
    pub fn with_flags(registry: &'a SymbolRegistry, flags: ResolveFlags) -> Self {
        Self {
            registry,
            flags,
            cache: RefCell::new(ConversionCache::default()),
            scans: Cell::new(0),
        }
    }

    pub fn registry(&self) -> &SymbolRegistry {
        self.registry
    }

    /// Whether the requesting scope has checked arithmetic.
    pub fn checked(&self) -> bool {
        self.flags.contains(ResolveFlags::CHECKED)
    }

    /// Whether the requesting scope permits pointer conversions.
    pub fn unsafe_allowed(&self) -> bool {
        self.flags.contains(ResolveFlags::UNSAFE)
    }

    /// How many user-operator candidate scans have run. Instrumentation for
    /// cache behavior tests.
    pub fn operator_scans(&self) -> u64 {
        self.scans.get()
    }

    /// Display name for diagnostics.
    pub fn type_name(&self, ty: TypeHash) -> String {
        self.registry.type_name(ty)
    }

    pub(crate) fn record_scan(&self) {
        self.scans.set(self.scans.get() + 1);
    }

    pub(crate) fn cache_get(
        &self,
        explicit: bool,
        key: (TypeHash, TypeHash),
    ) -> Option<Option<TypeHash>> {
        let cache = self.cache.borrow();
        let map = if explicit { &cache.explicit } else { &cache.implicit };
        map.get(&key).copied()
    }

    pub(crate) fn cache_put(&self, explicit: bool, key: (TypeHash, TypeHash), value: Option<TypeHash>) {
        let mut cache = self.cache.borrow_mut();
        let map = if explicit {
            &mut cache.explicit
        } else {
            &mut cache.implicit
        };
        map.insert(key, value);
    }
}
