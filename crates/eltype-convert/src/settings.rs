//! Process-wide ambient settings.
//!
//! The ambient value is seeded from [`Settings::default`] plus environment overrides on first use:
//! - `ELTYPE_PRECISION`: default `BigFloat` working precision in bits
//! - `ELTYPE_MAX_DEPTH`: maximum number of unwrap steps before classification gives up
//!
//! Every top-level operation reads it exactly once through [`current`].

use eltype_core::{EltypeError, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_PRECISION: u32 = 256;
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Working precision for dynamic-precision leaves when none is given explicitly
    pub default_precision: u32,
    /// Maximum container/wrapper nesting that classification will unwrap
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self { default_precision: DEFAULT_PRECISION, max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides();
        settings
    }

    /// Unparseable or out-of-range values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("ELTYPE_PRECISION") {
            if let Ok(bits) = val.trim().parse::<u32>() {
                if bits > 0 {
                    self.default_precision = bits;
                }
            }
        }

        if let Ok(val) = env::var("ELTYPE_MAX_DEPTH") {
            if let Ok(depth) = val.trim().parse::<usize>() {
                if depth > 0 {
                    self.max_depth = depth;
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_precision == 0 {
            return Err(EltypeError::InvalidPrecision(self.default_precision));
        }
        if self.max_depth == 0 {
            return Err(EltypeError::Config("max_depth must be at least 1".into()));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).map_err(|e| EltypeError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EltypeError::Config(e.to_string()))
    }
}

static AMBIENT: Lazy<RwLock<Settings>> = Lazy::new(|| RwLock::new(Settings::from_env()));

/// Snapshot of the ambient settings.
pub fn current() -> Settings { *AMBIENT.read() }

/// Replaces the ambient settings, returning the previous ones.
pub fn install(settings: Settings) -> Result<Settings> {
    settings.validate()?;
    Ok(std::mem::replace(&mut *AMBIENT.write(), settings))
}

pub fn default_precision() -> u32 { AMBIENT.read().default_precision }

/// Returns the previous default precision.
pub fn set_default_precision(bits: u32) -> Result<u32> {
    if bits == 0 {
        return Err(EltypeError::InvalidPrecision(bits));
    }
    let mut guard = AMBIENT.write();
    Ok(std::mem::replace(&mut guard.default_precision, bits))
}

struct RestorePrecision(u32);

impl Drop for RestorePrecision {
    fn drop(&mut self) { AMBIENT.write().default_precision = self.0; }
}

/// Runs `f` with the ambient default precision set to `bits`, restoring the old value afterwards.
///
/// The ambient value is process-wide, so other threads observe `bits` while `f` runs.
pub fn with_precision<R>(bits: u32, f: impl FnOnce() -> R) -> Result<R> {
    let previous = set_default_precision(bits)?;
    let _restore = RestorePrecision(previous);
    Ok(f())
}
