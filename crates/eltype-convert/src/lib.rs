pub mod classify;
pub mod convert;
pub mod ops;
pub mod precision;
pub mod settings;

pub use convert::Converter;
pub use ops::{
    basetype, basetype_with_limit, baseconvert, element_type, elconvert, precisionconvert, precisiontype,
    precisiontype_for, precisiontype_with_limit, to_basetype, to_eltype, to_precisiontype,
};
pub use precision::ResolvedPrecision;
pub use settings::{default_precision, set_default_precision, with_precision, Settings};
