use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::error::{EltypeError, Result};
use crate::scalar::Scalar;
use crate::ty::{ContainerKind, ScalarKind, TypeDesc, Typed};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Scalar(Scalar),
    Collection(Collection),
    Range(RangeValue),
    Complex { re: Box<Value>, im: Box<Value> },
    Ratio { num: Box<Value>, den: Box<Value> },
}

/// Arrays, bit arrays, sets and sequences. Array items are stored column-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    kind: ContainerKind,
    elem: TypeDesc,
    shape: Vec<usize>,
    items: Vec<Value>,
}

impl Collection {
    /// Checks item types and shape. Sets drop repeated members, keeping first occurrences.
    pub fn new(kind: ContainerKind, elem: TypeDesc, shape: Vec<usize>, items: Vec<Value>) -> Result<Self> {
        let kind = kind.with_element(&elem);
        if kind == ContainerKind::Range {
            return Err(EltypeError::unsupported("ranges are built with Value::range"));
        }
        for item in &items {
            let found = type_of(item);
            if found != elem {
                return Err(EltypeError::ElementMismatch { expected: elem.to_string(), found: found.to_string() });
            }
        }
        let (shape, items) = if kind == ContainerKind::Set {
            let mut unique: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                if !unique.contains(&item) {
                    unique.push(item);
                }
            }
            (vec![unique.len()], unique)
        } else {
            (shape, items)
        };
        if shape.len() != kind.ndims() || shape.iter().product::<usize>() != items.len() {
            return Err(EltypeError::unsupported(format!("shape {:?} does not hold {} items", shape, items.len())));
        }
        Ok(Collection { kind, elem, shape, items })
    }

    pub fn kind(&self) -> ContainerKind { self.kind }
    pub fn elem(&self) -> &TypeDesc { &self.elem }
    pub fn shape(&self) -> &[usize] { &self.shape }
    pub fn items(&self) -> &[Value] { &self.items }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

/// `start, start + step, ...` with `len` scalar elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeValue {
    start: Scalar,
    step: Scalar,
    len: usize,
}

impl RangeValue {
    pub fn new(start: Scalar, step: Scalar, len: usize) -> Result<Self> {
        if start.kind() != step.kind() {
            return Err(EltypeError::ElementMismatch { expected: start.kind().name().into(), found: step.kind().name().into() });
        }
        Ok(RangeValue { start, step, len })
    }

    pub fn start(&self) -> &Scalar { &self.start }
    pub fn step(&self) -> &Scalar { &self.step }
    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn elem_kind(&self) -> ScalarKind { self.start.kind() }

    /// `start + (len - 1) * step` as an exact rational. `None` for empty or non-finite ranges.
    pub fn last_exact(&self) -> Option<BigRational> {
        let steps = BigRational::from_integer(self.len.checked_sub(1)?.into());
        Some(self.start.to_rational()? + self.step.to_rational()? * steps)
    }

    /// The last element rounded to the element kind.
    pub fn last(&self) -> Option<Scalar> {
        Scalar::from_rational(self.elem_kind(), &self.last_exact()?, self.start.precision().unwrap_or(1)).ok()
    }
}

impl Value {
    pub fn array(elem: impl Into<TypeDesc>, shape: Vec<usize>, items: Vec<Value>) -> Result<Value> {
        let kind = ContainerKind::Array { ndims: shape.len() };
        Ok(Value::Collection(Collection::new(kind, elem.into(), shape, items)?))
    }
    pub fn vector(elem: impl Into<TypeDesc>, items: Vec<Value>) -> Result<Value> {
        let n = items.len();
        Value::array(elem, vec![n], items)
    }
    pub fn matrix(elem: impl Into<TypeDesc>, rows: usize, cols: usize, items: Vec<Value>) -> Result<Value> {
        Value::array(elem, vec![rows, cols], items)
    }
    pub fn bitarray(shape: Vec<usize>, bits: Vec<bool>) -> Result<Value> {
        let kind = ContainerKind::BitArray { ndims: shape.len() };
        let items = bits.into_iter().map(Value::from).collect();
        Ok(Value::Collection(Collection::new(kind, ScalarKind::Bool.into(), shape, items)?))
    }
    pub fn set(elem: impl Into<TypeDesc>, items: Vec<Value>) -> Result<Value> {
        let n = items.len();
        Ok(Value::Collection(Collection::new(ContainerKind::Set, elem.into(), vec![n], items)?))
    }
    pub fn sequence(elem: impl Into<TypeDesc>, items: Vec<Value>) -> Result<Value> {
        let n = items.len();
        Ok(Value::Collection(Collection::new(ContainerKind::Sequence, elem.into(), vec![n], items)?))
    }
    pub fn range(start: impl Into<Scalar>, step: impl Into<Scalar>, len: usize) -> Result<Value> {
        Ok(Value::Range(RangeValue::new(start.into(), step.into(), len)?))
    }

    /// Parts must share one scalar or ratio type.
    pub fn complex(re: Value, im: Value) -> Result<Value> {
        let (tr, ti) = (type_of(&re), type_of(&im));
        if tr != ti {
            return Err(EltypeError::ElementMismatch { expected: tr.to_string(), found: ti.to_string() });
        }
        if !matches!(tr, TypeDesc::Scalar(_) | TypeDesc::Ratio(_)) {
            return Err(EltypeError::unsupported(format!("complex component {tr} must be real")));
        }
        Ok(Value::Complex { re: Box::new(re), im: Box::new(im) })
    }

    /// Parts must share one integer kind. The result is reduced with a positive denominator.
    pub fn ratio(num: Value, den: Value) -> Result<Value> {
        let (n, d, kind) = match (&num, &den) {
            (Value::Scalar(n), Value::Scalar(d)) if n.kind() == d.kind() && n.kind().is_integer() => {
                match (n.to_bigint(), d.to_bigint()) {
                    (Some(a), Some(b)) => (a, b, n.kind()),
                    _ => return Err(EltypeError::unsupported("ratio parts must be integers")),
                }
            }
            _ => {
                return Err(EltypeError::ElementMismatch {
                    expected: "matching integer parts".into(),
                    found: format!("{}, {}", type_of(&num), type_of(&den)),
                })
            }
        };
        let (n, d) = if d.is_zero() {
            if n.is_zero() {
                return Err(EltypeError::unsupported("invalid ratio 0//0"));
            }
            (n.signum(), d)
        } else {
            let r = BigRational::new(n, d);
            (r.numer().clone(), r.denom().clone())
        };
        Ok(Value::Ratio {
            num: Box::new(Value::Scalar(Scalar::from_bigint(kind, &n)?)),
            den: Box::new(Value::Scalar(Scalar::from_bigint(kind, &d)?)),
        })
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_zero(),
            Value::Ratio { num, .. } => num.is_zero(),
            Value::Complex { re, im } => re.is_zero() && im.is_zero(),
            Value::Collection(_) | Value::Range(_) => false,
        }
    }

    /// Numerator and denominator of a ratio, if both are integer scalars.
    pub fn ratio_parts(&self) -> Option<(BigInt, BigInt)> {
        match self {
            Value::Ratio { num, den } => match (num.as_scalar()?, den.as_scalar()?) {
                (n, d) if n.kind().is_integer() && d.kind().is_integer() => Some((n.to_bigint()?, d.to_bigint()?)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Exact value of a real scalar or ratio.
    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            Value::Scalar(s) => s.to_rational(),
            Value::Ratio { .. } => {
                let (n, d) = self.ratio_parts()?;
                if d.is_zero() { None } else { Some(BigRational::new(n, d)) }
            }
            _ => None,
        }
    }
}

/// The type descriptor of a value.
pub fn type_of(v: &Value) -> TypeDesc {
    match v {
        Value::Scalar(s) => TypeDesc::Scalar(s.kind()),
        Value::Collection(c) => TypeDesc::Container(c.kind, Box::new(c.elem.clone())),
        Value::Range(r) => TypeDesc::Container(ContainerKind::Range, Box::new(TypeDesc::Scalar(r.elem_kind()))),
        Value::Complex { re, .. } => TypeDesc::Complex(Box::new(type_of(re))),
        Value::Ratio { num, .. } => TypeDesc::Ratio(Box::new(type_of(num))),
    }
}

impl Typed for Value {
    fn type_desc(&self) -> Cow<'_, TypeDesc> { Cow::Owned(type_of(self)) }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self { Value::Scalar(s) }
}

impl From<BigRational> for Value {
    fn from(r: BigRational) -> Self {
        Value::Ratio { num: Box::new(Value::from(r.numer().clone())), den: Box::new(Value::from(r.denom().clone())) }
    }
}
