//! The expression node model the conversion engine consumes and produces.
//!
//! The engine receives resolved expressions (type already known) and, on a
//! successful conversion, wraps them in exactly one [`CastKind`] node. The
//! cast kinds form a closed tagged variant; code generation dispatches on
//! the tag. Cast wrappers exclusively own their child, so expressions are
//! trees, never shared.

use std::fmt;

use crate::{PrimitiveKind, Span, TypeHash, corlib};

/// A compile-time constant value.
///
/// Constant conversions fold eagerly: converting a constant produces a new
/// retyped constant node rather than a cast wrapper, and convertibility can
/// depend on the specific value (range checks), not just the static type.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Bool(bool),
    SByte(i8),
    Byte(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Char(char),
    Float(f32),
    Double(f64),
    Str(String),
    Null,
}

impl Constant {
    /// The primitive kind of this constant, for the numeric kinds.
    pub fn kind(&self) -> Option<PrimitiveKind> {
        match self {
            Constant::Bool(_) => Some(PrimitiveKind::Bool),
            Constant::SByte(_) => Some(PrimitiveKind::SByte),
            Constant::Byte(_) => Some(PrimitiveKind::Byte),
            Constant::Short(_) => Some(PrimitiveKind::Short),
            Constant::UShort(_) => Some(PrimitiveKind::UShort),
            Constant::Int(_) => Some(PrimitiveKind::Int),
            Constant::UInt(_) => Some(PrimitiveKind::UInt),
            Constant::Long(_) => Some(PrimitiveKind::Long),
            Constant::ULong(_) => Some(PrimitiveKind::ULong),
            Constant::Char(_) => Some(PrimitiveKind::Char),
            Constant::Float(_) => Some(PrimitiveKind::Float),
            Constant::Double(_) => Some(PrimitiveKind::Double),
            Constant::Str(_) | Constant::Null => None,
        }
    }

    /// The static type of this constant.
    pub fn type_hash(&self) -> TypeHash {
        match self {
            Constant::Str(_) => corlib::STRING,
            Constant::Null => corlib::NULL,
            other => other
                .kind()
                .map(PrimitiveKind::type_hash)
                .unwrap_or(corlib::NULL),
        }
    }

    /// The integral value, for integral and char constants.
    pub fn int_value(&self) -> Option<i128> {
        match *self {
            Constant::SByte(v) => Some(v as i128),
            Constant::Byte(v) => Some(v as i128),
            Constant::Short(v) => Some(v as i128),
            Constant::UShort(v) => Some(v as i128),
            Constant::Int(v) => Some(v as i128),
            Constant::UInt(v) => Some(v as i128),
            Constant::Long(v) => Some(v as i128),
            Constant::ULong(v) => Some(v as i128),
            Constant::Char(v) => Some(v as i128),
            _ => None,
        }
    }

    /// Whether this is an integral constant equal to zero.
    pub fn is_integral_zero(&self) -> bool {
        self.int_value() == Some(0)
    }

    /// Whether this integral constant fits the target kind's value range.
    pub fn fits(&self, target: PrimitiveKind) -> bool {
        match (self.int_value(), target.integral_range()) {
            (Some(v), Some((lo, hi))) => lo <= v && v <= hi,
            _ => false,
        }
    }

    /// Value-preserving retype to another primitive kind.
    ///
    /// Integral targets require the value to fit (real sources truncate
    /// toward zero first and must land in range); real targets accept any
    /// numeric source, rounding permitted. Returns `None` when the value
    /// does not fit or the kinds are not numeric.
    pub fn retyped(&self, target: PrimitiveKind) -> Option<Constant> {
        if let Some(v) = self.int_value() {
            return match target {
                PrimitiveKind::Float => Some(Constant::Float(v as f32)),
                PrimitiveKind::Double => Some(Constant::Double(v as f64)),
                _ if self.fits(target) => Constant::from_integral(target, v),
                _ => None,
            };
        }
        let real = match *self {
            Constant::Float(v) => v as f64,
            Constant::Double(v) => v,
            _ => return None,
        };
        match target {
            PrimitiveKind::Float => Some(Constant::Float(real as f32)),
            PrimitiveKind::Double => Some(Constant::Double(real)),
            _ => {
                if !real.is_finite() {
                    return None;
                }
                let truncated = real.trunc();
                let (lo, hi) = target.integral_range()?;
                if (lo as f64) <= truncated && truncated <= (hi as f64) {
                    Constant::from_integral(target, truncated as i128)
                } else {
                    None
                }
            }
        }
    }

    /// Two's-complement truncation to an integral kind, for unchecked
    /// explicit constant casts.
    pub fn wrapped(&self, target: PrimitiveKind) -> Option<Constant> {
        let v = self.int_value()?;
        match target {
            PrimitiveKind::SByte => Some(Constant::SByte(v as i8)),
            PrimitiveKind::Byte => Some(Constant::Byte(v as u8)),
            PrimitiveKind::Short => Some(Constant::Short(v as i16)),
            PrimitiveKind::UShort => Some(Constant::UShort(v as u16)),
            PrimitiveKind::Int => Some(Constant::Int(v as i32)),
            PrimitiveKind::UInt => Some(Constant::UInt(v as u32)),
            PrimitiveKind::Long => Some(Constant::Long(v as i64)),
            PrimitiveKind::ULong => Some(Constant::ULong(v as u64)),
            // Truncated surrogate halves are not scalar values; those
            // casts stay as runtime narrowing nodes.
            PrimitiveKind::Char => char::from_u32(v as u16 as u32).map(Constant::Char),
            _ => None,
        }
    }

    fn from_integral(kind: PrimitiveKind, v: i128) -> Option<Constant> {
        match kind {
            PrimitiveKind::SByte => Some(Constant::SByte(v as i8)),
            PrimitiveKind::Byte => Some(Constant::Byte(v as u8)),
            PrimitiveKind::Short => Some(Constant::Short(v as i16)),
            PrimitiveKind::UShort => Some(Constant::UShort(v as u16)),
            PrimitiveKind::Int => Some(Constant::Int(v as i32)),
            PrimitiveKind::UInt => Some(Constant::UInt(v as u32)),
            PrimitiveKind::Long => Some(Constant::Long(v as i64)),
            PrimitiveKind::ULong => Some(Constant::ULong(v as u64)),
            PrimitiveKind::Char => char::from_u32(v as u32).map(Constant::Char),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(v) => write!(f, "{v}"),
            Constant::SByte(v) => write!(f, "{v}"),
            Constant::Byte(v) => write!(f, "{v}"),
            Constant::Short(v) => write!(f, "{v}"),
            Constant::UShort(v) => write!(f, "{v}"),
            Constant::Int(v) => write!(f, "{v}"),
            Constant::UInt(v) => write!(f, "{v}"),
            Constant::Long(v) => write!(f, "{v}"),
            Constant::ULong(v) => write!(f, "{v}"),
            Constant::Char(v) => write!(f, "'{v}'"),
            Constant::Float(v) => write!(f, "{v}"),
            Constant::Double(v) => write!(f, "{v}"),
            Constant::Str(v) => write!(f, "\"{v}\""),
            Constant::Null => write!(f, "null"),
        }
    }
}

/// The conversion a cast node performs.
#[derive(Debug, Clone, PartialEq)]
pub enum CastKind {
    /// Retype only, no instruction. Also covers enum wrap/unwrap and the
    /// `__arglist` / pointer-free reinterpretations.
    Identity,
    /// Lossless numeric widening. `from == to` encodes the explicit
    /// precision-forcing cast on float/double, which emits a conversion
    /// instruction even though the types match.
    NumericWiden {
        from: PrimitiveKind,
        to: PrimitiveKind,
    },
    /// Numeric narrowing; overflow-checked or silently truncating.
    NumericNarrow {
        from: PrimitiveKind,
        to: PrimitiveKind,
        checked: bool,
    },
    /// Value type wrapped as a reference.
    Box,
    /// Checked extraction of a boxed value type; traps at runtime when the
    /// boxed type disagrees.
    Unbox,
    /// Reference conversion to a base class or interface.
    RefUpcast,
    /// Runtime-checked reference conversion to a narrower type. `forced`
    /// casts emit the check even when the static types would allow eliding
    /// it.
    RefDowncast { forced: bool },
    /// Call of a user-defined conversion operator, by operator hash.
    UserOperator(TypeHash),
    /// Construction of a decimal from an integral or real value.
    DecimalIn,
    /// Extraction of a real value from a decimal.
    DecimalOut,
    /// `T` -> `Nullable<T>` wrap.
    WrapNullable,
    /// `Nullable<T>` -> `T`; traps at runtime when has-value is false.
    UnwrapNullable,
    /// The null literal as an empty `Nullable<T>`.
    LiftedNull,
    /// A conversion lifted over `Nullable`, threading the has-value flag
    /// around the child (which already converts the unwrapped value).
    Lifted,
    /// The null literal retyped to a reference or pointer target.
    NullRef,
    /// Pointer reinterpretation or pointer<->integral conversion.
    PointerCast,
    /// Conversion from `dynamic`, deferred to the runtime binder.
    Dynamic,
}

impl fmt::Display for CastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastKind::Identity => write!(f, "identity"),
            CastKind::NumericWiden { from, to } => write!(
                f,
                "widen {}_{}",
                from.il_tag().unwrap_or("??"),
                to.il_tag().unwrap_or("??")
            ),
            CastKind::NumericNarrow { from, to, checked } => write!(
                f,
                "narrow {}_{}{}",
                from.il_tag().unwrap_or("??"),
                to.il_tag().unwrap_or("??"),
                if *checked { " checked" } else { "" }
            ),
            CastKind::Box => write!(f, "box"),
            CastKind::Unbox => write!(f, "unbox"),
            CastKind::RefUpcast => write!(f, "upcast"),
            CastKind::RefDowncast { forced } => {
                write!(f, "downcast{}", if *forced { " forced" } else { "" })
            }
            CastKind::UserOperator(op) => write!(f, "operator {op}"),
            CastKind::DecimalIn => write!(f, "decimal-in"),
            CastKind::DecimalOut => write!(f, "decimal-out"),
            CastKind::WrapNullable => write!(f, "wrap"),
            CastKind::UnwrapNullable => write!(f, "unwrap"),
            CastKind::LiftedNull => write!(f, "lifted-null"),
            CastKind::Lifted => write!(f, "lifted"),
            CastKind::NullRef => write!(f, "null-ref"),
            CastKind::PointerCast => write!(f, "pointer-cast"),
            CastKind::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// What an expression node is.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A non-constant value of the expression's type: locals, parameters,
    /// call results, and the engine's immutable probe values.
    Value,
    /// A compile-time constant.
    Constant(Constant),
    /// An `__arglist` access.
    ArgList,
    /// A conversion wrapper around an owned child.
    Cast(CastKind, Box<Expr>),
}

/// A resolved expression: a static type, a node kind, and where it came
/// from. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub ty: TypeHash,
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    /// A plain value of the given type.
    pub fn value(ty: TypeHash, span: Span) -> Self {
        Self {
            ty,
            kind: ExprKind::Value,
            span,
        }
    }

    /// An immutable probe value used for "would a hypothetical expression
    /// of this type convert" checks. Never carries a constant, so probes
    /// observe only type-level rules.
    pub fn probe(ty: TypeHash) -> Self {
        Self::value(ty, Span::default())
    }

    /// A constant expression; the type follows from the value.
    pub fn constant(value: Constant, span: Span) -> Self {
        Self {
            ty: value.type_hash(),
            kind: ExprKind::Constant(value),
            span,
        }
    }

    /// The null literal.
    pub fn null(span: Span) -> Self {
        Self::constant(Constant::Null, span)
    }

    /// An `__arglist` access expression.
    pub fn arglist(span: Span) -> Self {
        Self {
            ty: corlib::ARG_LIST,
            kind: ExprKind::ArgList,
            span,
        }
    }

    /// Wrap a child in a cast node producing `ty`.
    pub fn cast(kind: CastKind, ty: TypeHash, child: Expr) -> Self {
        let span = child.span;
        Self {
            ty,
            kind: ExprKind::Cast(kind, Box::new(child)),
            span,
        }
    }

    /// This node's constant value, when it is a constant node.
    pub fn as_constant(&self) -> Option<&Constant> {
        match &self.kind {
            ExprKind::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this node is the null literal.
    pub fn is_null_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Constant(Constant::Null))
    }

    /// The cast tag and child, when this node is a cast.
    pub fn as_cast(&self) -> Option<(&CastKind, &Expr)> {
        match &self.kind {
            ExprKind::Cast(kind, child) => Some((kind, child)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;

    #[test]
    fn constant_types_follow_values() {
        assert_eq!(
            Expr::constant(Constant::Int(3), Span::default()).ty,
            primitives::INT
        );
        assert_eq!(Expr::null(Span::default()).ty, corlib::NULL);
    }

    #[test]
    fn int_constant_range_checks() {
        assert!(Constant::Int(127).fits(PrimitiveKind::SByte));
        assert!(!Constant::Int(128).fits(PrimitiveKind::SByte));
        assert!(Constant::Int(-1).fits(PrimitiveKind::SByte));
        assert!(!Constant::Int(-1).fits(PrimitiveKind::Byte));
        assert!(!Constant::Int(-1).fits(PrimitiveKind::ULong));
        assert!(Constant::Long(i64::MAX).fits(PrimitiveKind::ULong));
    }

    #[test]
    fn retype_preserves_values() {
        assert_eq!(
            Constant::Int(200).retyped(PrimitiveKind::Byte),
            Some(Constant::Byte(200))
        );
        assert_eq!(Constant::Int(300).retyped(PrimitiveKind::Byte), None);
        assert_eq!(
            Constant::Double(2.5).retyped(PrimitiveKind::Int),
            Some(Constant::Int(2))
        );
        assert_eq!(Constant::Double(1e300).retyped(PrimitiveKind::Int), None);
    }

    #[test]
    fn wrapping_truncates() {
        assert_eq!(
            Constant::Int(300).wrapped(PrimitiveKind::Byte),
            Some(Constant::Byte(44))
        );
        assert_eq!(
            Constant::Int(-1).wrapped(PrimitiveKind::ULong),
            Some(Constant::ULong(u64::MAX))
        );
        assert_eq!(
            Constant::Int(0x1_0041).wrapped(PrimitiveKind::Char),
            Some(Constant::Char('A'))
        );
        // Surrogate code units have no scalar representation.
        assert_eq!(Constant::Int(0xD800).wrapped(PrimitiveKind::Char), None);
    }

    #[test]
    fn cast_nodes_own_their_child() {
        let child = Expr::probe(primitives::INT);
        let cast = Expr::cast(
            CastKind::NumericWiden {
                from: PrimitiveKind::Int,
                to: PrimitiveKind::Long,
            },
            primitives::LONG,
            child.clone(),
        );
        assert_eq!(cast.ty, primitives::LONG);
        let (kind, inner) = cast.as_cast().unwrap();
        assert!(matches!(kind, CastKind::NumericWiden { .. }));
        assert_eq!(inner, &child);
    }
}
