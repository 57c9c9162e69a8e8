use std::fmt;

use crate::scalar::Scalar;
use crate::ty::{ContainerKind, ScalarKind, TypeDesc};
use crate::value::Value;

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Scalar(k) => write!(f, "{k}"),
            TypeDesc::Container(kind, elem) => match kind {
                ContainerKind::Array { ndims: 1 } => write!(f, "Vector{{{elem}}}"),
                ContainerKind::Array { ndims: 2 } => write!(f, "Matrix{{{elem}}}"),
                ContainerKind::Array { ndims } => write!(f, "Array{{{elem}, {ndims}}}"),
                ContainerKind::BitArray { ndims: 1 } => write!(f, "BitVector"),
                ContainerKind::BitArray { ndims: 2 } => write!(f, "BitMatrix"),
                ContainerKind::BitArray { ndims } => write!(f, "BitArray{{{ndims}}}"),
                ContainerKind::Set => write!(f, "Set{{{elem}}}"),
                ContainerKind::Range => write!(f, "Range{{{elem}}}"),
                ContainerKind::Sequence => write!(f, "Sequence{{{elem}}}"),
            },
            TypeDesc::Complex(c) => write!(f, "Complex{{{c}}}"),
            TypeDesc::Ratio(n) => write!(f, "Rational{{{n}}}"),
            TypeDesc::Knot(k) => f.write_str(k.name()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int8(n) => write!(f, "{n}"),
            Scalar::Int16(n) => write!(f, "{n}"),
            Scalar::Int32(n) => write!(f, "{n}"),
            Scalar::Int64(n) => write!(f, "{n}"),
            Scalar::Int128(n) => write!(f, "{n}"),
            Scalar::UInt8(n) => write!(f, "{n}"),
            Scalar::UInt16(n) => write!(f, "{n}"),
            Scalar::UInt32(n) => write!(f, "{n}"),
            Scalar::UInt64(n) => write!(f, "{n}"),
            Scalar::UInt128(n) => write!(f, "{n}"),
            Scalar::BigInt(n) => write!(f, "{n}"),
            // Debug keeps the trailing ".0" on whole floats
            Scalar::Float16(x) => write!(f, "{:?}", x.to_f32()),
            Scalar::Float32(x) => write!(f, "{x:?}"),
            Scalar::Float64(x) => write!(f, "{x:?}"),
            Scalar::BigFloat(x) => write!(f, "{x}"),
        }
    }
}

fn join(items: &[Value]) -> String { items.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ") }

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{s}"),
            Value::Collection(c) => match c.kind() {
                ContainerKind::Set => write!(f, "Set([{}])", join(c.items())),
                ContainerKind::Sequence => write!(f, "({})", join(c.items())),
                ContainerKind::Array { ndims: 1 } | ContainerKind::BitArray { ndims: 1 } => write!(f, "[{}]", join(c.items())),
                _ => {
                    let dims: Vec<String> = c.shape().iter().map(|d| d.to_string()).collect();
                    write!(f, "{}[{}]", dims.join("×"), join(c.items()))
                }
            },
            Value::Range(r) => match r.last() {
                Some(last) => write!(f, "{}:{}:{}", r.start(), r.step(), last),
                None => write!(f, "{}:{}:<{} items>", r.start(), r.step(), r.len()),
            },
            Value::Complex { re, im } => write!(f, "{re} + {im}im"),
            Value::Ratio { num, den } => write!(f, "{num}//{den}"),
        }
    }
}
