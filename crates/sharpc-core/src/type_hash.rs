//! Type identity hashing.
//!
//! Every type the engine reasons about is identified by a [`TypeHash`], a
//! 64-bit handle that is cheap to copy and compare. Named types (classes,
//! structs, interfaces, enums, delegates) hash their qualified name; derived
//! types (arrays, pointers, `Nullable<T>`, generic interface instances) mix
//! the hashes of their components so the same derived type always gets the
//! same identity without a registry round trip.
//!
//! Built-in types use reserved constants from a fixed namespace instead of
//! name hashes. This keeps them usable in `const` context and in `match`
//! patterns, and makes them independent of the hash function.

use std::fmt;

use xxhash_rust::xxh64::xxh64;

/// Domain-separation constants for the hash namespaces.
///
/// Composite hashes fold components together with `SEP` so that, for
/// example, `int[]` and `int*` can never collide even though they are built
/// from the same element hash.
pub mod hash_constants {
    /// Mixing multiplier between components of a composite hash.
    pub const SEP: u64 = 0x9e37_79b9_7f4a_7c15;
    /// Namespace tag for named types.
    pub const TYPE: u64 = 0x54e2_91cc_a4bf_0e61;
    /// Namespace tag for conversion operators.
    pub const OPERATOR: u64 = 0x8f1b_6d02_37c5_9a4d;
    /// Marker folded into array identities (together with the rank).
    pub const ARRAY: u64 = 0x11d3_f02a_885e_6c97;
    /// Marker folded into pointer identities.
    pub const POINTER: u64 = 0x66aa_0b5d_f310_24e9;
    /// Marker folded into `Nullable<T>` identities.
    pub const NULLABLE: u64 = 0x2c80_97e4_5d1b_ab33;
    /// Marker folded into generic-instance identities.
    pub const INSTANCE: u64 = 0xd94f_3a16_702c_8bb5;
}

/// Identity-comparable handle to a type.
///
/// Two hashes are equal iff they denote the same type. The engine relies on
/// this for all its fast paths; structural questions (variance, hierarchy)
/// go through the registry instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Hash a qualified type name.
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Identity of the array type `element[,..]` with the given rank.
    pub const fn array_of(element: TypeHash, rank: u8) -> Self {
        TypeHash(
            element
                .0
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(hash_constants::ARRAY ^ rank as u64),
        )
    }

    /// Identity of the pointer type `element*`.
    pub const fn pointer_to(element: TypeHash) -> Self {
        TypeHash(
            element
                .0
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(hash_constants::POINTER),
        )
    }

    /// Identity of `Nullable<underlying>`.
    pub const fn nullable_of(underlying: TypeHash) -> Self {
        TypeHash(
            underlying
                .0
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(hash_constants::NULLABLE),
        )
    }

    /// Identity of a generic instance `template<args..>`.
    pub fn generic_instance(template: TypeHash, args: &[TypeHash]) -> Self {
        let mut hash = template
            .0
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(hash_constants::INSTANCE);
        for arg in args {
            hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(arg.0);
        }
        TypeHash(hash)
    }

    /// Identity of a conversion operator, derived from its full signature.
    pub const fn operator(owner: TypeHash, param: TypeHash, ret: TypeHash, implicit: bool) -> Self {
        let mut hash = hash_constants::OPERATOR ^ owner.0;
        hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(param.0);
        hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(ret.0);
        TypeHash(hash ^ implicit as u64)
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

const fn reserved(n: u64) -> TypeHash {
    // Reserved identities live under a fixed tag byte. A name hash landing in
    // this range would need xxh64 to produce one of a few dozen exact values.
    TypeHash(0x5c00_0000_0000_0000 | n)
}

/// Identities of the built-in value types.
pub mod primitives {
    use super::{TypeHash, reserved};

    pub const VOID: TypeHash = reserved(0x01);
    pub const BOOL: TypeHash = reserved(0x02);
    pub const SBYTE: TypeHash = reserved(0x03);
    pub const BYTE: TypeHash = reserved(0x04);
    pub const SHORT: TypeHash = reserved(0x05);
    pub const USHORT: TypeHash = reserved(0x06);
    pub const INT: TypeHash = reserved(0x07);
    pub const UINT: TypeHash = reserved(0x08);
    pub const LONG: TypeHash = reserved(0x09);
    pub const ULONG: TypeHash = reserved(0x0a);
    pub const CHAR: TypeHash = reserved(0x0b);
    pub const FLOAT: TypeHash = reserved(0x0c);
    pub const DOUBLE: TypeHash = reserved(0x0d);
    pub const DECIMAL: TypeHash = reserved(0x0e);
}

/// Identities of the well-known reference types and pseudo-types the
/// conversion rules name explicitly.
pub mod corlib {
    use super::{TypeHash, reserved};

    pub const OBJECT: TypeHash = reserved(0x20);
    pub const STRING: TypeHash = reserved(0x21);
    /// `System.ValueType`.
    pub const VALUE_TYPE: TypeHash = reserved(0x22);
    /// `System.Enum`.
    pub const ENUM_TYPE: TypeHash = reserved(0x23);
    /// `System.Delegate`.
    pub const DELEGATE_TYPE: TypeHash = reserved(0x24);
    /// `System.Array`.
    pub const ARRAY_TYPE: TypeHash = reserved(0x25);
    /// `System.IntPtr`.
    pub const INTPTR: TypeHash = reserved(0x26);
    /// `System.UIntPtr`.
    pub const UINTPTR: TypeHash = reserved(0x27);
    /// `System.ArgIterator`, the only legal target of an `__arglist` access.
    pub const ARG_ITERATOR: TypeHash = reserved(0x28);

    /// Generic interface templates of the array-convertible family.
    pub const IENUMERABLE: TypeHash = reserved(0x30);
    pub const ICOLLECTION: TypeHash = reserved(0x31);
    pub const ILIST: TypeHash = reserved(0x32);

    /// The type of the `null` literal before it converts to anything.
    pub const NULL: TypeHash = reserved(0x40);
    /// The `dynamic` pseudo-type; conversions from it defer to runtime.
    pub const DYNAMIC: TypeHash = reserved(0x41);
    /// The type of an `__arglist` access expression.
    pub const ARG_LIST: TypeHash = reserved(0x42);
    /// The pseudo-type of a method group before overload selection binds
    /// it to a delegate type.
    pub const METHOD_GROUP: TypeHash = reserved(0x43);
    /// The pseudo-type of an anonymous function before it binds to a
    /// delegate type.
    pub const ANON_METHOD: TypeHash = reserved(0x44);
}
