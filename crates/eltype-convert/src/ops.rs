//! Public operations. Each call reads the ambient settings exactly once.

use eltype_core::{type_of, Result, TypeDesc, Typed, Value};
use tracing::debug;

use crate::classify;
use crate::convert::Converter;
use crate::precision;
use crate::settings::{self, Settings};

/// Complex and Ratio wrappers sit at most this many levels below the deepest container.
const WRAPPER_LEVELS: usize = 2;

pub fn element_type<T: Typed + ?Sized>(t: &T) -> TypeDesc { classify::element_type(&t.type_desc()) }

pub fn basetype<T: Typed + ?Sized>(t: &T) -> Result<TypeDesc> {
    classify::basetype_with_limit(&t.type_desc(), settings::current().max_depth)
}

pub fn basetype_with_limit<T: Typed + ?Sized>(t: &T, limit: usize) -> Result<TypeDesc> {
    classify::basetype_with_limit(&t.type_desc(), limit)
}

/// Precision type with no integer context: ratio wrappers are terminal.
pub fn precisiontype<T: Typed + ?Sized>(t: &T) -> Result<TypeDesc> {
    classify::precisiontype_with_limit(&t.type_desc(), false, settings::current().max_depth)
}

pub fn precisiontype_with_limit<T: Typed + ?Sized>(t: &T, integer_context: bool, limit: usize) -> Result<TypeDesc> {
    classify::precisiontype_with_limit(&t.type_desc(), integer_context, limit)
}

/// Precision type of `t` as seen by a conversion into `target`.
pub fn precisiontype_for<T: Typed + ?Sized, S: Typed + ?Sized>(target: &T, t: &S) -> Result<TypeDesc> {
    classify::precisiontype_for(&target.type_desc(), &t.type_desc(), settings::current().max_depth)
}

pub fn to_eltype<T: Typed + ?Sized, S: Typed + ?Sized>(t: &T, s: &S) -> TypeDesc {
    classify::to_eltype(&t.type_desc(), &s.type_desc())
}

pub fn to_basetype<T: Typed + ?Sized, S: Typed + ?Sized>(t: &T, s: &S) -> Result<TypeDesc> {
    classify::to_basetype(&t.type_desc(), &s.type_desc(), settings::current().max_depth)
}

pub fn to_precisiontype<T: Typed + ?Sized, S: Typed + ?Sized>(t: &T, s: &S) -> Result<TypeDesc> {
    classify::to_precisiontype(&t.type_desc(), &s.type_desc(), settings::current().max_depth)
}

/// Converts the elements one level down in `a` to the element type of `t`.
pub fn elconvert<T: Typed + ?Sized>(t: &T, a: &Value) -> Result<Value> {
    let settings = settings::current();
    let target = classify::to_eltype(&t.type_desc(), &type_of(a));
    run("elconvert", &target, a, None, &settings)
}

/// Converts every leaf of `a` to the basetype of `t`, keeping all levels of nesting.
pub fn baseconvert<T: Typed + ?Sized>(t: &T, a: &Value) -> Result<Value> {
    let settings = settings::current();
    let target = classify::to_basetype(&t.type_desc(), &type_of(a), settings.max_depth)?;
    run("baseconvert", &target, a, None, &settings)
}

/// Converts every leaf of `a` to the precision type of `t`.
///
/// `BigFloat` leaves are rounded to `prec` bits, or to the ambient default precision read once
/// at entry when `prec` is `None`.
pub fn precisionconvert<T: Typed + ?Sized>(t: &T, a: &Value, prec: Option<u32>) -> Result<Value> {
    let settings = settings::current();
    let target = classify::to_precisiontype(&t.type_desc(), &type_of(a), settings.max_depth)?;
    run("precisionconvert", &target, a, prec, &settings)
}

fn run(op: &'static str, target: &TypeDesc, value: &Value, prec: Option<u32>, settings: &Settings) -> Result<Value> {
    let resolved = precision::resolve(target, prec, settings)?;
    debug!(op, %target, bits = resolved.bits, explicit = resolved.explicit, applies = resolved.applies, "convert");
    Converter::new(resolved.bits, settings.max_depth.saturating_add(WRAPPER_LEVELS)).convert(target, value)
}
