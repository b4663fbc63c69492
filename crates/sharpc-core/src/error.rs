//! Error types for conversion resolution.
//!
//! "No conversion" is not an error at this layer: the engine's internal
//! cascade returns `Option` and leaves wording to the entry points. Only the
//! entry points that promise a result (`implicit_conversion_required`,
//! `explicit_conversion`) and the genuinely diagnosable conditions
//! (ambiguity, unsafe context, checked constant overflow) produce a
//! [`CompilationError`].

use thiserror::Error;

use crate::Span;

/// Errors surfaced by the conversion engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// An implicit conversion was required but none exists.
    #[error("at {span}: cannot implicitly convert type '{from}' to '{to}'")]
    CannotConvert {
        /// Display name of the source type.
        from: String,
        /// Display name of the target type.
        to: String,
        /// Where the conversion was required.
        span: Span,
    },

    /// An implicit conversion was required, none exists, but a cast would work.
    #[error(
        "at {span}: cannot implicitly convert type '{from}' to '{to}'; an explicit conversion exists (are you missing a cast?)"
    )]
    NeedsExplicitCast {
        /// Display name of the source type.
        from: String,
        /// Display name of the target type.
        to: String,
        /// Where the conversion was required.
        span: Span,
    },

    /// An explicit cast was written but no conversion exists.
    #[error("at {span}: cannot convert type '{from}' to '{to}'")]
    CannotCast {
        /// Display name of the source type.
        from: String,
        /// Display name of the target type.
        to: String,
        /// Where the cast was written.
        span: Span,
    },

    /// More than one user-defined operator was equally specific.
    #[error("at {span}: ambiguous user defined conversions when converting from '{from}' to '{to}'")]
    AmbiguousUserConversion {
        /// Display name of the source type.
        from: String,
        /// Display name of the target type.
        to: String,
        /// Where the conversion was requested.
        span: Span,
    },

    /// A pointer conversion was attempted outside an unsafe context.
    #[error("at {span}: pointer conversions may only appear in an unsafe context")]
    UnsafeRequired {
        /// Where the conversion was attempted.
        span: Span,
    },

    /// A constant does not fit the cast target under checked arithmetic.
    #[error(
        "at {span}: constant value '{value}' cannot be converted to '{target}' (use 'unchecked' syntax to override)"
    )]
    ConstantOutOfRange {
        /// The constant's value, rendered for the message.
        value: String,
        /// Display name of the target type.
        target: String,
        /// Where the cast was written.
        span: Span,
    },

    /// A programming error inside the compiler itself. Not recoverable.
    #[error("internal compiler error: {message}")]
    Internal {
        /// What went wrong.
        message: String,
    },
}

impl CompilationError {
    /// The span this error points at, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompilationError::CannotConvert { span, .. }
            | CompilationError::NeedsExplicitCast { span, .. }
            | CompilationError::CannotCast { span, .. }
            | CompilationError::AmbiguousUserConversion { span, .. }
            | CompilationError::UnsafeRequired { span }
            | CompilationError::ConstantOutOfRange { span, .. } => Some(*span),
            CompilationError::Internal { .. } => None,
        }
    }
}
