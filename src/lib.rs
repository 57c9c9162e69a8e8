//! Element, base and precision types of nested numeric containers, and conversions that rebuild
//! a value around a new leaf type without changing its shape.
//!
//! ```
//! use eltype::prelude::*;
//!
//! let t = TypeDesc::vector(TypeDesc::set(TypeDesc::complex(ScalarKind::Float64.into())));
//! assert_eq!(basetype(&t).unwrap(), TypeDesc::complex(ScalarKind::Float64.into()));
//! assert_eq!(precisiontype(&t).unwrap(), TypeDesc::Scalar(ScalarKind::Float64));
//!
//! let r = Value::range(1i64, 1i64, 10).unwrap();
//! assert_eq!(elconvert(&ScalarKind::Float64, &r).unwrap().to_string(), "1.0:1.0:10.0");
//! ```

pub use eltype_convert::{classify, settings, Converter};

pub use eltype_convert::{
    basetype, basetype_with_limit, baseconvert, default_precision, element_type, elconvert, precisionconvert,
    precisiontype, precisiontype_for, precisiontype_with_limit, set_default_precision, to_basetype, to_eltype,
    to_precisiontype, with_precision, Settings,
};
pub use eltype_core::{
    type_of, BigFloat, ConversionFailure, EltypeError, Result, Scalar, ScalarKind, TypeDesc, TypeKnot, Typed, Value,
};

pub mod prelude {
    pub use eltype_convert::{
        basetype, baseconvert, element_type, elconvert, precisionconvert, precisiontype, precisiontype_for, to_basetype,
        to_eltype, to_precisiontype,
    };
    pub use eltype_core::{type_of, EltypeError, Scalar, ScalarKind, TypeDesc, Typed, Value};
}
