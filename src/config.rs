//! Session-wide configuration.
//!
//! Mirrors the teacher's `Config` (serializable, validated, builder-style
//! `with_*` setters) but scoped to the settings the temporal algebra itself
//! reads: float emission precision and the default interpolation assumed
//! when a parser/reader does not say otherwise.

use serde::{Deserialize, Serialize};

/// Interpolation assumed for a `Sequence` when none is stated explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DefaultInterpolation {
    #[default]
    Linear,
    Step,
}

/// Session-wide engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of fractional digits emitted by float/point text
    /// output (`floatspan_out`-style rounding). Range `0..=15`.
    #[serde(default = "Config::default_maxdd")]
    pub maxdd: u32,

    /// Interpolation used when a textual/MF-JSON reader does not specify one.
    #[serde(default)]
    pub default_interpolation: DefaultInterpolation,
}

impl Config {
    const fn default_maxdd() -> u32 {
        6
    }

    pub fn with_maxdd(mut self, maxdd: u32) -> Self {
        self.maxdd = maxdd;
        self
    }

    pub fn with_default_interpolation(mut self, interp: DefaultInterpolation) -> Self {
        self.default_interpolation = interp;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.maxdd > 15 {
            return Err("maxdd must be between 0 and 15".to_string());
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            maxdd: Self::default_maxdd(),
            default_interpolation: DefaultInterpolation::default(),
        }
    }
}
