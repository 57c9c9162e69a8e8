use half::f16;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::bigfloat::{rational_to_f64, round_hardware, BigFloat};
use crate::error::{ConversionFailure, EltypeError, Result};
use crate::ty::ScalarKind;
use crate::value::Value;

/// A leaf value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Int128(i128),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    UInt128(u128),
    BigInt(BigInt),
    Float16(f16),
    Float32(f32),
    Float64(f64),
    BigFloat(BigFloat),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int8(_) => ScalarKind::Int8,
            Scalar::Int16(_) => ScalarKind::Int16,
            Scalar::Int32(_) => ScalarKind::Int32,
            Scalar::Int64(_) => ScalarKind::Int64,
            Scalar::Int128(_) => ScalarKind::Int128,
            Scalar::UInt8(_) => ScalarKind::UInt8,
            Scalar::UInt16(_) => ScalarKind::UInt16,
            Scalar::UInt32(_) => ScalarKind::UInt32,
            Scalar::UInt64(_) => ScalarKind::UInt64,
            Scalar::UInt128(_) => ScalarKind::UInt128,
            Scalar::BigInt(_) => ScalarKind::BigInt,
            Scalar::Float16(_) => ScalarKind::Float16,
            Scalar::Float32(_) => ScalarKind::Float32,
            Scalar::Float64(_) => ScalarKind::Float64,
            Scalar::BigFloat(_) => ScalarKind::BigFloat,
        }
    }

    pub fn zero(kind: ScalarKind, precision: u32) -> Result<Scalar> {
        Scalar::from_rational(kind, &BigRational::zero(), precision)
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Bool(b) => !b,
            Scalar::Float16(x) => x.to_f64() == 0.0,
            Scalar::Float32(x) => *x == 0.0,
            Scalar::Float64(x) => *x == 0.0,
            Scalar::BigFloat(x) => x.is_zero(),
            other => other.to_bigint().map_or(false, |n| n.is_zero()),
        }
    }

    /// Precision of a `BigFloat` leaf.
    pub fn precision(&self) -> Option<u32> {
        match self {
            Scalar::BigFloat(x) => Some(x.precision()),
            other => other.kind().fixed_precision(),
        }
    }

    /// Exact value, or `None` for NaN and infinities.
    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            Scalar::Float16(x) => BigRational::from_float(x.to_f64()),
            Scalar::Float32(x) => BigRational::from_float(*x),
            Scalar::Float64(x) => BigRational::from_float(*x),
            Scalar::BigFloat(x) => Some(x.to_rational()),
            other => other.to_bigint().map(BigRational::from_integer),
        }
    }

    pub fn to_bigint(&self) -> Option<BigInt> {
        Some(match self {
            Scalar::Bool(b) => BigInt::from(u8::from(*b)),
            Scalar::Int8(n) => BigInt::from(*n),
            Scalar::Int16(n) => BigInt::from(*n),
            Scalar::Int32(n) => BigInt::from(*n),
            Scalar::Int64(n) => BigInt::from(*n),
            Scalar::Int128(n) => BigInt::from(*n),
            Scalar::UInt8(n) => BigInt::from(*n),
            Scalar::UInt16(n) => BigInt::from(*n),
            Scalar::UInt32(n) => BigInt::from(*n),
            Scalar::UInt64(n) => BigInt::from(*n),
            Scalar::UInt128(n) => BigInt::from(*n),
            Scalar::BigInt(n) => n.clone(),
            _ => return None,
        })
    }

    fn hardware_float(&self) -> Option<f64> {
        match self {
            Scalar::Float16(x) => Some(x.to_f64()),
            Scalar::Float32(x) => Some(f64::from(*x)),
            Scalar::Float64(x) => Some(*x),
            _ => None,
        }
    }

    /// `convert(kind, self)`. `precision` only matters when `kind` is `BigFloat`.
    pub fn convert_to(&self, kind: ScalarKind, precision: u32) -> Result<Scalar> {
        if let Scalar::BigFloat(x) = self {
            if kind == ScalarKind::BigFloat {
                return Ok(Scalar::BigFloat(x.with_precision(precision)?));
            }
        }
        if kind == self.kind() {
            return Ok(self.clone());
        }
        // Float to float keeps NaN and the infinities.
        if let (Some(x), Some(_)) = (self.hardware_float(), kind.fixed_precision()) {
            return Ok(hardware_from_f64(kind, x));
        }
        let r = self
            .to_rational()
            .ok_or_else(|| EltypeError::conversion(self, kind.name(), ConversionFailure::NotFinite))?;
        Scalar::from_rational(kind, &r, precision)
    }

    pub fn from_rational(kind: ScalarKind, r: &BigRational, precision: u32) -> Result<Scalar> {
        match kind {
            ScalarKind::Float16 => Ok(Scalar::Float16(f16::from_f64(round_hardware(r, 11, -24)))),
            ScalarKind::Float32 => Ok(Scalar::Float32(round_hardware(r, 24, -149) as f32)),
            ScalarKind::Float64 => Ok(Scalar::Float64(rational_to_f64(r))),
            ScalarKind::BigFloat => Ok(Scalar::BigFloat(BigFloat::from_rational(r, precision)?)),
            _ if !r.is_integer() => Err(EltypeError::conversion(r, kind.name(), ConversionFailure::Inexact)),
            _ => Scalar::from_bigint(kind, &r.to_integer()),
        }
    }

    /// Integer kinds only; out-of-range values fail with `Overflow`.
    pub fn from_bigint(kind: ScalarKind, n: &BigInt) -> Result<Scalar> {
        let overflow = || EltypeError::conversion(n, kind.name(), ConversionFailure::Overflow);
        Ok(match kind {
            ScalarKind::Bool => match n.to_u8() {
                Some(0) => Scalar::Bool(false),
                Some(1) => Scalar::Bool(true),
                _ => return Err(EltypeError::conversion(n, "Bool", ConversionFailure::Inexact)),
            },
            ScalarKind::Int8 => Scalar::Int8(n.to_i8().ok_or_else(overflow)?),
            ScalarKind::Int16 => Scalar::Int16(n.to_i16().ok_or_else(overflow)?),
            ScalarKind::Int32 => Scalar::Int32(n.to_i32().ok_or_else(overflow)?),
            ScalarKind::Int64 => Scalar::Int64(n.to_i64().ok_or_else(overflow)?),
            ScalarKind::Int128 => Scalar::Int128(n.to_i128().ok_or_else(overflow)?),
            ScalarKind::UInt8 => Scalar::UInt8(n.to_u8().ok_or_else(overflow)?),
            ScalarKind::UInt16 => Scalar::UInt16(n.to_u16().ok_or_else(overflow)?),
            ScalarKind::UInt32 => Scalar::UInt32(n.to_u32().ok_or_else(overflow)?),
            ScalarKind::UInt64 => Scalar::UInt64(n.to_u64().ok_or_else(overflow)?),
            ScalarKind::UInt128 => Scalar::UInt128(n.to_u128().ok_or_else(overflow)?),
            ScalarKind::BigInt => Scalar::BigInt(n.clone()),
            float => return Err(EltypeError::unsupported(format!("{} is not an integer kind", float.name()))),
        })
    }
}

fn hardware_from_f64(kind: ScalarKind, x: f64) -> Scalar {
    match kind {
        ScalarKind::Float16 => Scalar::Float16(f16::from_f64(x)),
        ScalarKind::Float32 => Scalar::Float32(x as f32),
        _ => Scalar::Float64(x),
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Scalar {
            fn from(v: $ty) -> Self { Scalar::$variant(v) }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self { Value::Scalar(Scalar::$variant(v)) }
        })*
    };
}

scalar_from!(
    bool => Bool, i8 => Int8, i16 => Int16, i32 => Int32, i64 => Int64, i128 => Int128,
    u8 => UInt8, u16 => UInt16, u32 => UInt32, u64 => UInt64, u128 => UInt128,
    BigInt => BigInt, f16 => Float16, f32 => Float32, f64 => Float64, BigFloat => BigFloat,
);
