use eltype_core::{EltypeError, Result, TypeDesc};

use crate::settings::Settings;

/// The single working precision used by one conversion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPrecision {
    pub bits: u32,
    /// Taken from the caller rather than the ambient settings
    pub explicit: bool,
    /// Whether any leaf of the target type is dynamic-precision
    pub applies: bool,
}

/// Resolves the precision for a call converting into `target`.
///
/// `settings` must be the snapshot taken at call entry; the result is threaded through the whole
/// conversion so every leaf sees the same value.
pub fn resolve(target: &TypeDesc, explicit: Option<u32>, settings: &Settings) -> Result<ResolvedPrecision> {
    let bits = match explicit {
        Some(0) => return Err(EltypeError::InvalidPrecision(0)),
        Some(bits) => bits,
        None => settings.default_precision,
    };
    Ok(ResolvedPrecision { bits, explicit: explicit.is_some(), applies: has_dynamic_leaf(target, settings.max_depth) })
}

fn has_dynamic_leaf(t: &TypeDesc, budget: usize) -> bool {
    if budget == 0 {
        return false;
    }
    match t.resolved() {
        TypeDesc::Scalar(k) => k.is_dynamic_precision(),
        TypeDesc::Container(_, inner) | TypeDesc::Complex(inner) | TypeDesc::Ratio(inner) => has_dynamic_leaf(inner, budget - 1),
        TypeDesc::Knot(_) => false,
    }
}
