//! Binary floating point with a per-value working precision.
//!
//! A `BigFloat` is `mantissa * 2^exponent` with `|mantissa| < 2^precision`, rounded to nearest
//! with ties to even. The mantissa is kept odd (or zero) so equal values have equal fields.

use num_bigint::{BigInt, BigUint, Sign};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ConversionFailure, EltypeError, Result};

const LOG10_2: f64 = 0.301_029_995_663_981_2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigFloat {
    mantissa: BigInt,
    exponent: i64,
    precision: u32,
}

impl BigFloat {
    pub fn zero(precision: u32) -> Result<Self> {
        check_precision(precision)?;
        Ok(BigFloat { mantissa: BigInt::zero(), exponent: 0, precision })
    }

    pub fn from_rational(r: &BigRational, precision: u32) -> Result<Self> {
        check_precision(precision)?;
        let neg = r.is_negative();
        let (mantissa, exponent) = round_ratio(neg, r.numer().magnitude(), r.denom().magnitude(), precision);
        Ok(BigFloat { mantissa, exponent, precision })
    }

    pub fn from_integer(n: &BigInt, precision: u32) -> Result<Self> {
        Self::from_rational(&BigRational::from_integer(n.clone()), precision)
    }

    pub fn from_f64(x: f64, precision: u32) -> Result<Self> {
        let r = BigRational::from_float(x)
            .ok_or_else(|| EltypeError::conversion(x, "BigFloat", ConversionFailure::NotFinite))?;
        Self::from_rational(&r, precision)
    }

    /// Parses a decimal literal such as `-12.5e-3` and rounds it once to `precision`.
    pub fn parse(s: &str, precision: u32) -> Result<Self> {
        let r = parse_decimal(s)
            .ok_or_else(|| EltypeError::conversion(format!("{s:?}"), "BigFloat", ConversionFailure::Malformed))?;
        Self::from_rational(&r, precision)
    }

    pub fn precision(&self) -> u32 { self.precision }

    pub fn with_precision(&self, precision: u32) -> Result<Self> {
        if precision == self.precision {
            return Ok(self.clone());
        }
        Self::from_rational(&self.to_rational(), precision)
    }

    pub fn is_zero(&self) -> bool { self.mantissa.is_zero() }

    pub fn is_negative(&self) -> bool { self.mantissa.is_negative() }

    /// Exact value.
    pub fn to_rational(&self) -> BigRational {
        if self.exponent >= 0 {
            BigRational::from_integer(&self.mantissa << self.exponent as usize)
        } else {
            BigRational::new(self.mantissa.clone(), BigInt::one() << self.exponent.unsigned_abs() as usize)
        }
    }

    pub fn to_f64(&self) -> f64 { rational_to_f64(&self.to_rational()) }
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool { self.mantissa == other.mantissa && self.exponent == other.exponent }
}

impl fmt::Display for BigFloat {
    /// Decimal expansion truncated to the digits the precision supports.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0.0");
        }
        let r = self.to_rational().abs();
        let int = r.to_integer();
        let mut frac = r.fract();
        let significant = (f64::from(self.precision) * LOG10_2).ceil() as usize + 1;
        let int_str = int.to_string();
        let mut budget = if int.is_zero() { significant } else { significant.saturating_sub(int_str.len()) };
        let mut digits = String::new();
        let ten = BigRational::from_integer(BigInt::from(10u32));
        let mut leading = int.is_zero();
        while budget > 0 && !frac.is_zero() {
            frac = &frac * &ten;
            let d = frac.to_integer();
            frac = frac.fract();
            if !(leading && d.is_zero()) {
                leading = false;
                budget -= 1;
            }
            digits.push_str(&d.to_string());
        }
        let digits = digits.trim_end_matches('0');
        let sign = if self.is_negative() { "-" } else { "" };
        if digits.is_empty() {
            write!(f, "{sign}{int_str}.0")
        } else {
            write!(f, "{sign}{int_str}.{digits}")
        }
    }
}

fn check_precision(precision: u32) -> Result<()> {
    if precision == 0 { Err(EltypeError::InvalidPrecision(precision)) } else { Ok(()) }
}

pub(crate) fn rational_to_f64(r: &BigRational) -> f64 {
    r.to_f64().unwrap_or(if r.is_negative() { f64::NEG_INFINITY } else { f64::INFINITY })
}

/// Rounds `r` to nearest-even in a binary format with `precision` significand bits whose
/// smallest subnormal is `2^min_exp`. Every such result is exact in `f64`.
pub(crate) fn round_hardware(r: &BigRational, precision: u32, min_exp: i64) -> f64 {
    if r.is_zero() {
        return 0.0;
    }
    let neg = r.is_negative();
    let (num, den) = (r.numer().magnitude(), r.denom().magnitude());
    let min_normal = min_exp + i64::from(precision) - 1;
    let subnormal = if min_normal < 0 {
        (num << min_normal.unsigned_abs() as usize) < *den
    } else {
        *num < (den << min_normal as usize)
    };
    let x = if subnormal {
        // fixed spacing of 2^min_exp below the smallest normal
        let n = num << min_exp.unsigned_abs() as usize;
        let mut q = &n / den;
        let twice = (&n % den) << 1usize;
        if twice > *den || (twice == *den && q.bit(0)) {
            q += 1u32;
        }
        q.to_f64().unwrap_or(0.0) * 2f64.powi(min_exp as i32)
    } else {
        let (m, e) = round_ratio(false, num, den, precision);
        m.to_f64().unwrap_or(f64::INFINITY) * 2f64.powi(e.clamp(-1100, 1100) as i32)
    };
    if neg { -x } else { x }
}

fn round_ratio(neg: bool, num: &BigUint, den: &BigUint, precision: u32) -> (BigInt, i64) {
    if num.is_zero() {
        return (BigInt::zero(), 0);
    }
    let p = i64::from(precision);
    // The scaled quotient has p+1 or p+2 bits.
    let shift = p + 1 - (num.bits() as i64 - den.bits() as i64);
    let (n, d) = if shift >= 0 {
        (num << shift as usize, den.clone())
    } else {
        (num.clone(), den << shift.unsigned_abs() as usize)
    };
    let q = &n / &d;
    let sticky = !(&n % &d).is_zero();
    let extra = q.bits() as i64 - p;
    let mask = (BigUint::one() << extra as usize) - 1u32;
    let low = &q & &mask;
    let half = BigUint::one() << (extra - 1) as usize;
    let mut m = q >> extra as usize;
    let mut exponent = extra - shift;
    if low > half || (low == half && (sticky || m.bit(0))) {
        m += 1u32;
        if m.bits() as i64 > p {
            m >>= 1usize;
            exponent += 1;
        }
    }
    let tz = m.trailing_zeros().unwrap_or(0);
    m >>= tz as usize;
    exponent += tz as i64;
    (BigInt::from_biguint(if neg { Sign::Minus } else { Sign::Plus }, m), exponent)
}

fn parse_decimal(s: &str) -> Option<BigRational> {
    let s = s.trim();
    let (neg, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (mant, exp) = match body.find(|c| c == 'e' || c == 'E') {
        Some(i) => (&body[..i], body[i + 1..].parse::<i64>().ok()?),
        None => (body, 0),
    };
    let (int_part, frac_part) = mant.split_once('.').unwrap_or((mant, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let digits: BigInt = format!("{int_part}{frac_part}").parse().ok()?;
    let scale = exp.checked_sub(frac_part.len() as i64)?;
    let ten = BigInt::from(10u32);
    let r = if scale >= 0 {
        BigRational::from_integer(digits * num_traits::pow(ten, usize::try_from(scale).ok()?))
    } else {
        BigRational::new(digits, num_traits::pow(ten, usize::try_from(scale.unsigned_abs()).ok()?))
    };
    Some(if neg { -r } else { r })
}
