//! SymbolRegistry - unified type and operator storage.
//!
//! All type entries are stored in a single map by [`TypeHash`] for O(1)
//! lookup; conversion operators live in their own map and are referenced
//! from their owning class or struct by operator hash.
//!
//! The registry is populated single-threaded while the surrounding type
//! system loads declarations, and is effectively read-only once conversion
//! resolution starts. The fact predicates at the bottom of this file are
//! pure queries with no side effects, safe to call at any phase.

use rustc_hash::FxHashMap;

use sharpc_core::{
    ArrayEntry, ClassEntry, GenericInstanceEntry, InterfaceEntry, NullableEntry, OperatorEntry,
    PointerEntry, PrimitiveEntry, PrimitiveKind, StructEntry, TypeEntry, TypeHash, Variance,
    corlib, primitives,
};

/// Unified type and operator registry.
#[derive(Default)]
pub struct SymbolRegistry {
    types: FxHashMap<TypeHash, TypeEntry>,
    operators: FxHashMap<TypeHash, OperatorEntry>,
}

impl SymbolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the primitives and the well-known corlib
    /// types pre-registered, including the `IntPtr`/`UIntPtr` explicit
    /// operators and the generic collection interface templates.
    pub fn with_corlib() -> Self {
        let mut registry = Self::new();

        for kind in PrimitiveKind::ALL {
            registry.register(PrimitiveEntry::new(kind));
        }

        registry.register(ClassEntry::with_hash("object", corlib::OBJECT));
        registry.register(
            ClassEntry::with_hash("string", corlib::STRING)
                .with_base(corlib::OBJECT)
                .sealed(),
        );
        registry.register(
            ClassEntry::with_hash("System.ValueType", corlib::VALUE_TYPE).with_base(corlib::OBJECT),
        );
        registry.register(
            ClassEntry::with_hash("System.Enum", corlib::ENUM_TYPE).with_base(corlib::VALUE_TYPE),
        );
        registry.register(
            ClassEntry::with_hash("System.Delegate", corlib::DELEGATE_TYPE)
                .with_base(corlib::OBJECT),
        );
        registry.register(
            ClassEntry::with_hash("System.Array", corlib::ARRAY_TYPE).with_base(corlib::OBJECT),
        );
        registry.register(StructEntry::with_hash("System.ArgIterator", corlib::ARG_ITERATOR));

        registry.register(StructEntry::with_hash("System.IntPtr", corlib::INTPTR));
        registry.register_operator(OperatorEntry::explicit(
            corlib::INTPTR,
            primitives::INT,
            corlib::INTPTR,
        ));
        registry.register_operator(OperatorEntry::explicit(
            corlib::INTPTR,
            primitives::LONG,
            corlib::INTPTR,
        ));
        registry.register_operator(OperatorEntry::explicit(
            corlib::INTPTR,
            corlib::INTPTR,
            primitives::INT,
        ));
        registry.register_operator(OperatorEntry::explicit(
            corlib::INTPTR,
            corlib::INTPTR,
            primitives::LONG,
        ));

        registry.register(StructEntry::with_hash("System.UIntPtr", corlib::UINTPTR));
        registry.register_operator(OperatorEntry::explicit(
            corlib::UINTPTR,
            primitives::UINT,
            corlib::UINTPTR,
        ));
        registry.register_operator(OperatorEntry::explicit(
            corlib::UINTPTR,
            primitives::ULONG,
            corlib::UINTPTR,
        ));
        registry.register_operator(OperatorEntry::explicit(
            corlib::UINTPTR,
            corlib::UINTPTR,
            primitives::ULONG,
        ));
        // Corlib declares UIntPtr -> uint as well; the engine's lookup
        // carve-out refuses it, matching the compiler this models.
        registry.register_operator(OperatorEntry::explicit(
            corlib::UINTPTR,
            corlib::UINTPTR,
            primitives::UINT,
        ));

        registry.register(
            InterfaceEntry::with_hash(
                "System.Collections.Generic.IEnumerable`1",
                corlib::IENUMERABLE,
            )
            .with_variance(vec![Variance::Covariant]),
        );
        registry.register(
            InterfaceEntry::with_hash(
                "System.Collections.Generic.ICollection`1",
                corlib::ICOLLECTION,
            )
            .with_base(corlib::IENUMERABLE)
            .with_variance(vec![Variance::Invariant]),
        );
        registry.register(
            InterfaceEntry::with_hash("System.Collections.Generic.IList`1", corlib::ILIST)
                .with_base(corlib::ICOLLECTION)
                .with_variance(vec![Variance::Invariant]),
        );

        registry
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a type entry, returning its identity.
    pub fn register(&mut self, entry: impl Into<TypeEntry>) -> TypeHash {
        let entry = entry.into();
        let hash = entry.type_hash();
        self.types.insert(hash, entry);
        hash
    }

    /// Register a conversion operator and attach it to its owner.
    pub fn register_operator(&mut self, op: OperatorEntry) -> TypeHash {
        let hash = op.hash;
        match self.types.get_mut(&op.owner) {
            Some(TypeEntry::Class(class)) => class.conversions.push(hash),
            Some(TypeEntry::Struct(st)) => st.conversions.push(hash),
            _ => {}
        }
        self.operators.insert(hash, op);
        hash
    }

    /// Register (idempotently) the array type `element[..]`.
    pub fn register_array(&mut self, element: TypeHash, rank: u8) -> TypeHash {
        self.register(ArrayEntry::new(element, rank))
    }

    /// Register (idempotently) the pointer type `element*`.
    pub fn register_pointer(&mut self, element: TypeHash) -> TypeHash {
        self.register(PointerEntry::new(element))
    }

    /// Register (idempotently) `Nullable<underlying>`.
    pub fn register_nullable(&mut self, underlying: TypeHash) -> TypeHash {
        self.register(NullableEntry::new(underlying))
    }

    /// Register (idempotently) an instance of a generic interface template.
    pub fn register_instance(&mut self, template: TypeHash, args: Vec<TypeHash>) -> TypeHash {
        self.register(GenericInstanceEntry::new(template, args))
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Look a type entry up by identity.
    pub fn get(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&hash)
    }

    /// Look a conversion operator up by identity.
    pub fn operator(&self, hash: TypeHash) -> Option<&OperatorEntry> {
        self.operators.get(&hash)
    }

    /// All conversion operators declared on `ty` or its base classes.
    /// Implicit operators are always included; explicit operators only when
    /// `include_explicit` is set.
    pub fn conversion_operators(&self, ty: TypeHash, include_explicit: bool) -> Vec<&OperatorEntry> {
        let mut out = Vec::new();
        let mut current = Some(ty);
        while let Some(hash) = current {
            let hashes: &[TypeHash] = match self.get(hash) {
                Some(TypeEntry::Class(e)) => &e.conversions,
                Some(TypeEntry::Struct(e)) => &e.conversions,
                _ => &[],
            };
            for op_hash in hashes {
                if let Some(op) = self.operators.get(op_hash)
                    && (op.is_implicit || include_explicit)
                {
                    out.push(op);
                }
            }
            current = self.base_of(hash);
        }
        out
    }

    // ==========================================================================
    // Fact predicates
    // ==========================================================================

    /// Whether `ty` is a value type (primitives other than void, structs,
    /// enums, nullables). Type parameters are never known to be value types
    /// here; their conversions go through the effective-base rules.
    pub fn is_value_type(&self, ty: TypeHash) -> bool {
        match self.get(ty) {
            Some(TypeEntry::Primitive(e)) => e.kind != PrimitiveKind::Void,
            Some(TypeEntry::Struct(_) | TypeEntry::Enum(_) | TypeEntry::Nullable(_)) => true,
            _ => false,
        }
    }

    /// Whether `ty` is known to be a reference type.
    pub fn is_reference_type(&self, ty: TypeHash) -> bool {
        match self.get(ty) {
            Some(
                TypeEntry::Class(_)
                | TypeEntry::Interface(_)
                | TypeEntry::Delegate(_)
                | TypeEntry::Array(_)
                | TypeEntry::GenericInstance(_),
            ) => true,
            Some(TypeEntry::TypeParam(e)) => e.has_reference_constraint,
            _ => false,
        }
    }

    /// Whether `ty` has struct (non-enum value type) layout.
    pub fn is_struct(&self, ty: TypeHash) -> bool {
        match self.get(ty) {
            Some(TypeEntry::Primitive(e)) => e.kind != PrimitiveKind::Void,
            Some(TypeEntry::Struct(_)) => true,
            _ => false,
        }
    }

    pub fn is_enum(&self, ty: TypeHash) -> bool {
        matches!(self.get(ty), Some(TypeEntry::Enum(_)))
    }

    /// The underlying integral type of an enum.
    pub fn enum_underlying(&self, ty: TypeHash) -> Option<TypeHash> {
        self.get(ty).and_then(TypeEntry::as_enum).map(|e| e.underlying)
    }

    pub fn is_delegate_type(&self, ty: TypeHash) -> bool {
        matches!(self.get(ty), Some(TypeEntry::Delegate(_)))
    }

    pub fn is_generic_parameter(&self, ty: TypeHash) -> bool {
        matches!(self.get(ty), Some(TypeEntry::TypeParam(_)))
    }

    pub fn is_interface(&self, ty: TypeHash) -> bool {
        matches!(
            self.get(ty),
            Some(TypeEntry::Interface(_) | TypeEntry::GenericInstance(_))
        )
    }

    pub fn is_nullable(&self, ty: TypeHash) -> bool {
        matches!(self.get(ty), Some(TypeEntry::Nullable(_)))
    }

    /// The underlying type of `Nullable<T>`.
    pub fn nullable_underlying(&self, ty: TypeHash) -> Option<TypeHash> {
        self.get(ty).and_then(TypeEntry::as_nullable).map(|e| e.underlying)
    }

    pub fn is_pointer(&self, ty: TypeHash) -> bool {
        matches!(self.get(ty), Some(TypeEntry::Pointer(_)))
    }

    /// The immediate base of `ty` in the class hierarchy. Classes without a
    /// declared base root at `object`; structs, enums, delegates, arrays,
    /// and nullables get their corlib abstract bases.
    pub fn base_of(&self, ty: TypeHash) -> Option<TypeHash> {
        match self.get(ty)? {
            TypeEntry::Class(e) => e.base.or_else(|| {
                (ty != corlib::OBJECT).then_some(corlib::OBJECT)
            }),
            TypeEntry::Struct(_) => Some(corlib::VALUE_TYPE),
            TypeEntry::Primitive(e) => {
                (e.kind != PrimitiveKind::Void).then_some(corlib::VALUE_TYPE)
            }
            TypeEntry::Enum(_) => Some(corlib::ENUM_TYPE),
            TypeEntry::Delegate(_) => Some(corlib::DELEGATE_TYPE),
            TypeEntry::Array(_) => Some(corlib::ARRAY_TYPE),
            TypeEntry::Nullable(_) => Some(corlib::VALUE_TYPE),
            TypeEntry::TypeParam(e) => Some(e.effective_base),
            TypeEntry::Interface(_) | TypeEntry::Pointer(_) | TypeEntry::GenericInstance(_) => None,
        }
    }

    /// Whether `child` is a strict subclass of `parent` along the base
    /// chain.
    pub fn is_subclass_of(&self, child: TypeHash, parent: TypeHash) -> bool {
        if child == parent {
            return false;
        }
        let mut current = self.base_of(child);
        while let Some(hash) = current {
            if hash == parent {
                return true;
            }
            current = self.base_of(hash);
        }
        false
    }

    /// Whether interface `a` (strictly) extends interface `b`. For generic
    /// instances this follows the template's base chain with identical
    /// arguments; variance-aware matching is the engine's concern.
    pub fn interface_extends(&self, a: TypeHash, b: TypeHash) -> bool {
        if a == b {
            return false;
        }
        match self.get(a) {
            Some(TypeEntry::Interface(e)) => e
                .bases
                .iter()
                .any(|&base| base == b || self.interface_extends(base, b)),
            Some(TypeEntry::GenericInstance(e)) => {
                let Some(TypeEntry::GenericInstance(other)) =
                    self.get(b)
                else {
                    return false;
                };
                e.args == other.args && self.template_extends(e.template, other.template)
            }
            _ => false,
        }
    }

    fn template_extends(&self, a: TypeHash, b: TypeHash) -> bool {
        if a == b {
            return false;
        }
        match self.get(a) {
            Some(TypeEntry::Interface(e)) => e
                .bases
                .iter()
                .any(|&base| base == b || self.template_extends(base, b)),
            _ => false,
        }
    }

    /// Whether `ty` implements interface `iface`, directly, through a base
    /// class, or through interface extension.
    pub fn implements_interface(&self, ty: TypeHash, iface: TypeHash) -> bool {
        let direct: Vec<TypeHash> = match self.get(ty) {
            Some(TypeEntry::Class(e)) => e.interfaces.clone(),
            Some(TypeEntry::Struct(e)) => e.interfaces.clone(),
            Some(TypeEntry::TypeParam(e)) => e.constraints.clone(),
            _ => Vec::new(),
        };
        for implemented in direct {
            if implemented == iface || self.interface_extends(implemented, iface) {
                return true;
            }
        }
        if let Some(base) = self.base_of(ty) {
            return self.implements_interface(base, iface);
        }
        false
    }

    /// Whether casts to a narrower type can be ruled out statically.
    pub fn is_sealed(&self, ty: TypeHash) -> bool {
        match self.get(ty) {
            Some(TypeEntry::Class(e)) => e.is_sealed,
            Some(
                TypeEntry::Primitive(_)
                | TypeEntry::Struct(_)
                | TypeEntry::Enum(_)
                | TypeEntry::Delegate(_)
                | TypeEntry::Array(_)
                | TypeEntry::Nullable(_),
            ) => true,
            _ => false,
        }
    }

    /// Display name for diagnostics.
    pub fn type_name(&self, ty: TypeHash) -> String {
        match ty {
            corlib::NULL => return "null".into(),
            corlib::DYNAMIC => return "dynamic".into(),
            corlib::ARG_LIST => return "__arglist".into(),
            corlib::METHOD_GROUP => return "method group".into(),
            corlib::ANON_METHOD => return "anonymous method".into(),
            _ => {}
        }
        match self.get(ty) {
            Some(TypeEntry::Array(e)) => {
                let commas = ",".repeat(e.rank.saturating_sub(1) as usize);
                format!("{}[{commas}]", self.type_name(e.element))
            }
            Some(TypeEntry::Pointer(e)) => format!("{}*", self.type_name(e.element)),
            Some(TypeEntry::Nullable(e)) => format!("{}?", self.type_name(e.underlying)),
            Some(TypeEntry::GenericInstance(e)) => {
                let args: Vec<String> = e.args.iter().map(|&a| self.type_name(a)).collect();
                let template = self.type_name(e.template);
                let simple = template.rsplit('.').next().unwrap_or(&template);
                let simple = simple.split('`').next().unwrap_or(simple);
                format!("{}<{}>", simple, args.join(", "))
            }
            Some(entry) => entry.name().map(str::to_owned).unwrap_or_else(|| ty.to_string()),
            None => ty.to_string(),
        }
    }
}
