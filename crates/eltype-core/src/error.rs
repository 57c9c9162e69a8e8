use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EltypeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EltypeError {
    #[error("Recursion error: no fixpoint for {ty} within {limit} unwrap steps")]
    Recursion { ty: String, limit: usize },
    #[error("Conversion error: cannot convert {value} to {target} ({reason})")]
    Conversion { value: String, target: String, reason: ConversionFailure },
    #[error("Unsupported structure: {0}")]
    UnsupportedStructure(String),
    #[error("Element mismatch: expected {expected}, found {found}")]
    ElementMismatch { expected: String, found: String },
    #[error("Invalid precision: {0} bits")]
    InvalidPrecision(u32),
    #[error("Config error: {0}")]
    Config(String),
}

/// Why a leaf value could not be represented in its target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionFailure {
    /// The value has a fractional or imaginary part the target cannot hold.
    Inexact,
    /// The value is outside the target's range.
    Overflow,
    /// NaN or infinity headed for a type without such values.
    NotFinite,
    /// Distinct set members became equal after conversion.
    CollapsedSet,
    /// A textual literal that does not parse as a number.
    Malformed,
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inexact => write!(f, "inexact"),
            Self::Overflow => write!(f, "overflow"),
            Self::NotFinite => write!(f, "not finite"),
            Self::CollapsedSet => write!(f, "set members collapsed"),
            Self::Malformed => write!(f, "malformed literal"),
        }
    }
}

impl EltypeError {
    pub fn conversion(value: impl fmt::Display, target: impl fmt::Display, reason: ConversionFailure) -> Self {
        EltypeError::Conversion { value: value.to_string(), target: target.to_string(), reason }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self { EltypeError::UnsupportedStructure(msg.into()) }

    pub fn is_recursion(&self) -> bool { matches!(self, EltypeError::Recursion { .. }) }
    pub fn is_conversion(&self) -> bool { matches!(self, EltypeError::Conversion { .. }) }
    pub fn is_unsupported(&self) -> bool { matches!(self, EltypeError::UnsupportedStructure(_)) }
}
