pub mod bigfloat;
pub mod error;
pub mod pretty;
pub mod scalar;
pub mod ty;
pub mod value;

pub use bigfloat::BigFloat;
pub use error::{ConversionFailure, EltypeError, Result};
pub use scalar::Scalar;
pub use ty::{ContainerKind, ScalarKind, TypeDesc, TypeKnot, Typed};
pub use value::{type_of, Collection, RangeValue, Value};
