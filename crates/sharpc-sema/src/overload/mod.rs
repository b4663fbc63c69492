//! Overload tie-breaking utilities.
//!
//! The most-encompassed/encompassing selection and the most-specific
//! source/target computations are shared between user-defined conversion
//! operator resolution and the surrounding overload-resolution consumers.

pub mod encompass;

pub use encompass::{find_most_encompassed, find_most_encompassing};

use sharpc_core::{Expr, OperatorEntry, TypeHash};

use crate::ConversionContext;
use crate::conversion::{implicit_standard_conversion_exists, implicit_standard_exists_types};

fn dedup(types: Vec<TypeHash>) -> Vec<TypeHash> {
    let mut out: Vec<TypeHash> = Vec::with_capacity(types.len());
    for t in types {
        if !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

/// The most specific operand type Sx among the candidates' parameter
/// types, relative to the actual source expression.
///
/// An exact parameter match wins outright. Otherwise implicit lookups take
/// the most encompassed parameter type; explicit lookups first restrict to
/// the parameter types the source implicitly converts to (taking the most
/// encompassed), and fall back to the most encompassing type of the full
/// set when that restriction is empty.
pub(crate) fn most_specific_source(
    ctx: &ConversionContext<'_>,
    candidates: &[OperatorEntry],
    source: &Expr,
    explicit: bool,
) -> Option<TypeHash> {
    if candidates.iter().any(|op| op.param == source.ty) {
        return Some(source.ty);
    }
    let params = dedup(candidates.iter().map(|op| op.param).collect());
    if !explicit {
        return find_most_encompassed(ctx, &params);
    }
    let reachable: Vec<TypeHash> = params
        .iter()
        .copied()
        .filter(|&p| implicit_standard_conversion_exists(ctx, source, p))
        .collect();
    if !reachable.is_empty() {
        find_most_encompassed(ctx, &reachable)
    } else {
        find_most_encompassing(ctx, &params)
    }
}

/// The most specific result type Tx among the candidates' return types,
/// relative to the requested target. The roles of encompassed and
/// encompassing swap against [`most_specific_source`].
pub(crate) fn most_specific_target(
    ctx: &ConversionContext<'_>,
    candidates: &[OperatorEntry],
    target: TypeHash,
    explicit: bool,
) -> Option<TypeHash> {
    if candidates.iter().any(|op| op.ret == target) {
        return Some(target);
    }
    let rets = dedup(candidates.iter().map(|op| op.ret).collect());
    if !explicit {
        return find_most_encompassing(ctx, &rets);
    }
    let reaching: Vec<TypeHash> = rets
        .iter()
        .copied()
        .filter(|&r| implicit_standard_exists_types(ctx, r, target))
        .collect();
    if !reaching.is_empty() {
        find_most_encompassing(ctx, &reaching)
    } else {
        find_most_encompassed(ctx, &rets)
    }
}
