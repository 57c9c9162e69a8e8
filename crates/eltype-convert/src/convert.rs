//! Shape-preserving value conversion.

use eltype_core::{
    type_of, Collection, ConversionFailure, ContainerKind, EltypeError, RangeValue, Result, Scalar, ScalarKind, TypeDesc,
    Value,
};
use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::Zero;
use tracing::trace;

/// Rebuilds values against a fully resolved target type.
///
/// One converter is built per top-level call, so every leaf sees the same working precision.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    precision: u32,
    limit: usize,
}

impl Converter {
    pub fn new(precision: u32, limit: usize) -> Self { Converter { precision, limit } }

    pub fn precision(&self) -> u32 { self.precision }

    /// Converts `value` to `target`. Nothing is returned unless every leaf converts.
    pub fn convert(&self, target: &TypeDesc, value: &Value) -> Result<Value> { self.go(target, value, 0) }

    fn go(&self, target: &TypeDesc, value: &Value, depth: usize) -> Result<Value> {
        if depth > self.limit {
            return Err(EltypeError::Recursion { ty: target.to_string(), limit: self.limit });
        }
        let target = target.resolved();
        match (target, value) {
            (TypeDesc::Knot(k), _) => Err(EltypeError::unsupported(format!("type {} is not tied", k.name()))),

            (TypeDesc::Container(kind, elem), Value::Collection(c)) => {
                if !kind.same_structure(c.kind()) {
                    return Err(mismatch(value, target));
                }
                let elem = elem.resolved();
                let items = c.items().iter().map(|item| self.go(elem, item, depth + 1)).collect::<Result<Vec<_>>>()?;
                trace!(ty = %target, items = items.len(), "rebuilt collection");
                let rebuilt = Collection::new(*kind, elem.clone(), c.shape().to_vec(), items)?;
                if rebuilt.len() != c.len() {
                    return Err(EltypeError::conversion(value, target, ConversionFailure::CollapsedSet));
                }
                Ok(Value::Collection(rebuilt))
            }

            (TypeDesc::Container(ContainerKind::Range, elem), Value::Range(r)) => {
                let kind = elem
                    .as_scalar()
                    .ok_or_else(|| EltypeError::unsupported(format!("range elements must be scalars, not {elem}")))?;
                let start = r.start().convert_to(kind, self.precision)?;
                let step = r.step().convert_to(kind, self.precision)?;
                // start and step can fit while later elements do not
                if let Some(last) = r.last_exact().filter(|_| r.len() > 1) {
                    Scalar::from_rational(kind, &last, self.precision)?;
                }
                Ok(Value::Range(RangeValue::new(start, step, r.len())?))
            }

            (TypeDesc::Container(..), _) | (_, Value::Collection(_) | Value::Range(_)) => Err(mismatch(value, target)),

            (TypeDesc::Complex(component), Value::Complex { re, im }) => {
                Value::complex(self.go(component, re, depth + 1)?, self.go(component, im, depth + 1)?)
            }

            (TypeDesc::Complex(component), real) => {
                let re = self.go(component, real, depth + 1)?;
                let im = self.go(component, &Value::from(false), depth + 1)?;
                Value::complex(re, im)
            }

            (_, Value::Complex { re, im }) => {
                if !im.is_zero() {
                    return Err(EltypeError::conversion(value, target, ConversionFailure::Inexact));
                }
                self.go(target, re, depth + 1)
            }

            (TypeDesc::Ratio(part), Value::Ratio { num, den }) => {
                let part = TypeDesc::Scalar(ratio_part(part)?);
                integer_parts(value)?;
                Value::ratio(self.go(&part, num, depth + 1)?, self.go(&part, den, depth + 1)?)
            }

            (TypeDesc::Ratio(part), Value::Scalar(s)) => {
                let kind = ratio_part(part)?;
                let (num, den) = match s.to_rational() {
                    Some(r) => (r.numer().clone(), r.denom().clone()),
                    None => match infinity_sign(s) {
                        Some(sign) => (BigInt::from(sign), BigInt::from(0)),
                        None => return Err(EltypeError::conversion(value, target, ConversionFailure::NotFinite)),
                    },
                };
                Value::ratio(Value::Scalar(Scalar::from_bigint(kind, &num)?), Value::Scalar(Scalar::from_bigint(kind, &den)?))
            }

            (TypeDesc::Scalar(kind), Value::Scalar(s)) => Ok(Value::Scalar(s.convert_to(*kind, self.precision)?)),

            (TypeDesc::Scalar(kind), Value::Ratio { .. }) => {
                let (num, den) = integer_parts(value)?;
                if !den.is_zero() {
                    let r = BigRational::new(num, den);
                    return Ok(Value::Scalar(Scalar::from_rational(*kind, &r, self.precision)?));
                }
                // n//0 is a signed infinity, which only hardware floats can hold
                if kind.fixed_precision().is_none() {
                    return Err(EltypeError::conversion(value, target, ConversionFailure::NotFinite));
                }
                let inf = if num.sign() == Sign::Minus { f64::NEG_INFINITY } else { f64::INFINITY };
                Ok(Value::Scalar(Scalar::Float64(inf).convert_to(*kind, self.precision)?))
            }
        }
    }
}

/// Ratio parts must be integer scalars; a ratio of complex numbers has no conversion rule.
fn ratio_part(part: &TypeDesc) -> Result<ScalarKind> {
    part.as_scalar()
        .filter(|k| k.is_integer())
        .ok_or_else(|| EltypeError::unsupported(format!("Rational{{{part}}} has no integer parts")))
}

/// Values built by hand can carry non-integer ratio parts.
fn integer_parts(value: &Value) -> Result<(BigInt, BigInt)> {
    value
        .ratio_parts()
        .ok_or_else(|| EltypeError::unsupported(format!("{} has non-integer ratio parts", type_of(value))))
}

fn infinity_sign(s: &Scalar) -> Option<i8> {
    match s.convert_to(ScalarKind::Float64, 53).ok()? {
        Scalar::Float64(x) if x == f64::INFINITY => Some(1),
        Scalar::Float64(x) if x == f64::NEG_INFINITY => Some(-1),
        _ => None,
    }
}

fn mismatch(value: &Value, target: &TypeDesc) -> EltypeError {
    EltypeError::unsupported(format!("no rule converts {} to {target}", type_of(value)))
}
