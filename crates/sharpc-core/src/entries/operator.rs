//! User-defined conversion operator entries.

use crate::TypeHash;

/// A user-defined `operator implicit` / `operator explicit` declaration.
///
/// Conversion operators are static, take exactly one parameter, and may be
/// declared on either the source or the target side of a conversion; the
/// resolver searches both.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorEntry {
    pub hash: TypeHash,
    /// The type declaring the operator.
    pub owner: TypeHash,
    /// The single parameter type.
    pub param: TypeHash,
    /// The return type.
    pub ret: TypeHash,
    /// Whether this is `operator implicit` (else `operator explicit`).
    pub is_implicit: bool,
}

impl OperatorEntry {
    /// Declare an `operator implicit`.
    pub fn implicit(owner: TypeHash, param: TypeHash, ret: TypeHash) -> Self {
        Self {
            hash: TypeHash::operator(owner, param, ret, true),
            owner,
            param,
            ret,
            is_implicit: true,
        }
    }

    /// Declare an `operator explicit`.
    pub fn explicit(owner: TypeHash, param: TypeHash, ret: TypeHash) -> Self {
        Self {
            hash: TypeHash::operator(owner, param, ret, false),
            owner,
            param,
            ret,
            is_implicit: false,
        }
    }
}
