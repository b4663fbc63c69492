//! Built-in value type kinds.

use std::fmt;

use crate::{TypeHash, primitives};

/// The built-in primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Bool,
    SByte,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Char,
    Float,
    Double,
    Decimal,
}

impl PrimitiveKind {
    /// All kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 14] = [
        PrimitiveKind::Void,
        PrimitiveKind::Bool,
        PrimitiveKind::SByte,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::UShort,
        PrimitiveKind::Int,
        PrimitiveKind::UInt,
        PrimitiveKind::Long,
        PrimitiveKind::ULong,
        PrimitiveKind::Char,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Decimal,
    ];

    /// The identity for this primitive.
    pub const fn type_hash(self) -> TypeHash {
        match self {
            PrimitiveKind::Void => primitives::VOID,
            PrimitiveKind::Bool => primitives::BOOL,
            PrimitiveKind::SByte => primitives::SBYTE,
            PrimitiveKind::Byte => primitives::BYTE,
            PrimitiveKind::Short => primitives::SHORT,
            PrimitiveKind::UShort => primitives::USHORT,
            PrimitiveKind::Int => primitives::INT,
            PrimitiveKind::UInt => primitives::UINT,
            PrimitiveKind::Long => primitives::LONG,
            PrimitiveKind::ULong => primitives::ULONG,
            PrimitiveKind::Char => primitives::CHAR,
            PrimitiveKind::Float => primitives::FLOAT,
            PrimitiveKind::Double => primitives::DOUBLE,
            PrimitiveKind::Decimal => primitives::DECIMAL,
        }
    }

    /// Look a kind up by identity.
    pub fn from_hash(hash: TypeHash) -> Option<Self> {
        PrimitiveKind::ALL.into_iter().find(|k| k.type_hash() == hash)
    }

    /// The language-level keyword for this kind.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::SByte => "sbyte",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::UShort => "ushort",
            PrimitiveKind::Int => "int",
            PrimitiveKind::UInt => "uint",
            PrimitiveKind::Long => "long",
            PrimitiveKind::ULong => "ulong",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Decimal => "decimal",
        }
    }

    /// IL-style width tag used to name narrowing conversion modes.
    /// `None` for the kinds with no arithmetic conversion instruction.
    pub const fn il_tag(self) -> Option<&'static str> {
        match self {
            PrimitiveKind::SByte => Some("I1"),
            PrimitiveKind::Byte => Some("U1"),
            PrimitiveKind::Short => Some("I2"),
            PrimitiveKind::UShort => Some("U2"),
            PrimitiveKind::Int => Some("I4"),
            PrimitiveKind::UInt => Some("U4"),
            PrimitiveKind::Long => Some("I8"),
            PrimitiveKind::ULong => Some("U8"),
            PrimitiveKind::Char => Some("CH"),
            PrimitiveKind::Float => Some("R4"),
            PrimitiveKind::Double => Some("R8"),
            _ => None,
        }
    }

    /// Whether this kind participates in the numeric conversion tables.
    /// Decimal does not: it converts only through dedicated wrappers.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            PrimitiveKind::SByte
                | PrimitiveKind::Byte
                | PrimitiveKind::Short
                | PrimitiveKind::UShort
                | PrimitiveKind::Int
                | PrimitiveKind::UInt
                | PrimitiveKind::Long
                | PrimitiveKind::ULong
                | PrimitiveKind::Char
                | PrimitiveKind::Float
                | PrimitiveKind::Double
        )
    }

    /// Whether this kind is an integral type (char included).
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::SByte
                | PrimitiveKind::Byte
                | PrimitiveKind::Short
                | PrimitiveKind::UShort
                | PrimitiveKind::Int
                | PrimitiveKind::UInt
                | PrimitiveKind::Long
                | PrimitiveKind::ULong
                | PrimitiveKind::Char
        )
    }

    /// Inclusive value range for the integral kinds.
    pub const fn integral_range(self) -> Option<(i128, i128)> {
        match self {
            PrimitiveKind::SByte => Some((i8::MIN as i128, i8::MAX as i128)),
            PrimitiveKind::Byte => Some((0, u8::MAX as i128)),
            PrimitiveKind::Short => Some((i16::MIN as i128, i16::MAX as i128)),
            PrimitiveKind::UShort => Some((0, u16::MAX as i128)),
            PrimitiveKind::Int => Some((i32::MIN as i128, i32::MAX as i128)),
            PrimitiveKind::UInt => Some((0, u32::MAX as i128)),
            PrimitiveKind::Long => Some((i64::MIN as i128, i64::MAX as i128)),
            PrimitiveKind::ULong => Some((0, u64::MAX as i128)),
            PrimitiveKind::Char => Some((0, char::MAX as i128)),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Registry entry for a built-in primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveEntry {
    pub kind: PrimitiveKind,
}

impl PrimitiveEntry {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self { kind }
    }

    pub fn type_hash(&self) -> TypeHash {
        self.kind.type_hash()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}
