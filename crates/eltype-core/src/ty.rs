use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::error::{EltypeError, Result};

/// Terminal leaf types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    BigInt,
    Float16,
    Float32,
    Float64,
    BigFloat,
}

impl ScalarKind {
    /// `Bool` is an integer kind, as is `BigInt`.
    pub fn is_integer(self) -> bool {
        !matches!(self, ScalarKind::Float16 | ScalarKind::Float32 | ScalarKind::Float64 | ScalarKind::BigFloat)
    }

    pub fn is_float(self) -> bool { !self.is_integer() }

    /// Only `BigFloat` takes its working precision from the caller or the ambient settings.
    pub fn is_dynamic_precision(self) -> bool { matches!(self, ScalarKind::BigFloat) }

    /// Significand bits of the fixed-precision float kinds.
    pub fn fixed_precision(self) -> Option<u32> {
        match self {
            ScalarKind::Float16 => Some(11),
            ScalarKind::Float32 => Some(24),
            ScalarKind::Float64 => Some(53),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "Bool",
            ScalarKind::Int8 => "Int8",
            ScalarKind::Int16 => "Int16",
            ScalarKind::Int32 => "Int32",
            ScalarKind::Int64 => "Int64",
            ScalarKind::Int128 => "Int128",
            ScalarKind::UInt8 => "UInt8",
            ScalarKind::UInt16 => "UInt16",
            ScalarKind::UInt32 => "UInt32",
            ScalarKind::UInt64 => "UInt64",
            ScalarKind::UInt128 => "UInt128",
            ScalarKind::BigInt => "BigInt",
            ScalarKind::Float16 => "Float16",
            ScalarKind::Float32 => "Float32",
            ScalarKind::Float64 => "Float64",
            ScalarKind::BigFloat => "BigFloat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    Array { ndims: usize },
    /// Packed array of `Bool`.
    BitArray { ndims: usize },
    Set,
    Range,
    Sequence,
}

impl ContainerKind {
    pub const VECTOR: ContainerKind = ContainerKind::Array { ndims: 1 };
    pub const MATRIX: ContainerKind = ContainerKind::Array { ndims: 2 };

    pub fn ndims(self) -> usize {
        match self {
            ContainerKind::Array { ndims } | ContainerKind::BitArray { ndims } => ndims,
            ContainerKind::Set | ContainerKind::Range | ContainerKind::Sequence => 1,
        }
    }

    /// The kind used when this container is rebuilt around `elem`.
    pub fn with_element(self, elem: &TypeDesc) -> ContainerKind {
        match self {
            ContainerKind::BitArray { ndims } if *elem != TypeDesc::Scalar(ScalarKind::Bool) => ContainerKind::Array { ndims },
            other => other,
        }
    }

    /// Whether a value of kind `other` can be rebuilt as `self`.
    pub fn same_structure(self, other: ContainerKind) -> bool {
        match (self, other) {
            (ContainerKind::Array { ndims: a } | ContainerKind::BitArray { ndims: a },
             ContainerKind::Array { ndims: b } | ContainerKind::BitArray { ndims: b }) => a == b,
            (a, b) => a == b,
        }
    }
}

/// Closed description of a (possibly nested) type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDesc {
    Scalar(ScalarKind),
    Container(ContainerKind, Box<TypeDesc>),
    /// Composite numeric wrapper around a real component type.
    Complex(Box<TypeDesc>),
    /// Exact fraction; the payload is the numerator/denominator type.
    Ratio(Box<TypeDesc>),
    #[serde(skip)]
    Knot(TypeKnot),
}

impl TypeDesc {
    pub fn scalar(kind: ScalarKind) -> Self { TypeDesc::Scalar(kind) }
    pub fn container(kind: ContainerKind, elem: TypeDesc) -> Self {
        TypeDesc::Container(kind.with_element(&elem), Box::new(elem))
    }
    pub fn vector(elem: TypeDesc) -> Self { Self::container(ContainerKind::VECTOR, elem) }
    pub fn matrix(elem: TypeDesc) -> Self { Self::container(ContainerKind::MATRIX, elem) }
    pub fn array(ndims: usize, elem: TypeDesc) -> Self { Self::container(ContainerKind::Array { ndims }, elem) }
    pub fn bitarray(ndims: usize) -> Self {
        TypeDesc::Container(ContainerKind::BitArray { ndims }, Box::new(TypeDesc::Scalar(ScalarKind::Bool)))
    }
    pub fn set(elem: TypeDesc) -> Self { Self::container(ContainerKind::Set, elem) }
    pub fn range(elem: TypeDesc) -> Self { Self::container(ContainerKind::Range, elem) }
    pub fn sequence(elem: TypeDesc) -> Self { Self::container(ContainerKind::Sequence, elem) }
    pub fn complex(component: TypeDesc) -> Self { TypeDesc::Complex(Box::new(component)) }
    pub fn ratio(component: TypeDesc) -> Self { TypeDesc::Ratio(Box::new(component)) }

    pub fn is_container(&self) -> bool { matches!(self.resolved(), TypeDesc::Container(..)) }

    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self.resolved() {
            TypeDesc::Scalar(k) => Some(*k),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool { self.as_scalar().map_or(false, ScalarKind::is_integer) }

    /// One step through a tied knot; every other descriptor is returned as is.
    pub fn resolved(&self) -> &TypeDesc {
        match self {
            TypeDesc::Knot(k) => k.get().unwrap_or(self),
            other => other,
        }
    }
}

impl From<ScalarKind> for TypeDesc {
    fn from(kind: ScalarKind) -> Self { TypeDesc::Scalar(kind) }
}

/// A named, late-bound descriptor for self-referential types.
///
/// A knot is tied at most once, always to a structural descriptor, and compares by identity.
#[derive(Clone)]
pub struct TypeKnot {
    name: Arc<str>,
    slot: Arc<OnceLock<TypeDesc>>,
}

impl TypeKnot {
    pub fn new(name: &str) -> Self { TypeKnot { name: Arc::from(name), slot: Arc::new(OnceLock::new()) } }

    pub fn name(&self) -> &str { &self.name }

    pub fn get(&self) -> Option<&TypeDesc> { self.slot.get() }

    pub fn tie(&self, ty: TypeDesc) -> Result<()> {
        if matches!(ty, TypeDesc::Knot(_)) {
            return Err(EltypeError::unsupported(format!("knot {} cannot be tied to another knot", self.name)));
        }
        self.slot
            .set(ty)
            .map_err(|_| EltypeError::unsupported(format!("knot {} is already tied", self.name)))
    }

    pub fn desc(&self) -> TypeDesc { TypeDesc::Knot(self.clone()) }
}

impl PartialEq for TypeKnot {
    fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.slot, &other.slot) }
}

impl Eq for TypeKnot {}

impl Hash for TypeKnot {
    fn hash<H: Hasher>(&self, state: &mut H) { (Arc::as_ptr(&self.slot) as usize).hash(state) }
}

impl std::fmt::Debug for TypeKnot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Knot({}{})", self.name, if self.get().is_some() { "" } else { ", untied" })
    }
}

/// Anything a type can be read off: a descriptor, a scalar kind, or a value.
pub trait Typed {
    fn type_desc(&self) -> Cow<'_, TypeDesc>;
}

impl Typed for TypeDesc {
    fn type_desc(&self) -> Cow<'_, TypeDesc> { Cow::Borrowed(self) }
}

impl Typed for ScalarKind {
    fn type_desc(&self) -> Cow<'_, TypeDesc> { Cow::Owned(TypeDesc::Scalar(*self)) }
}
