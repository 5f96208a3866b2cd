//! Error surface for chronogeo.
//!
//! Every constructor and binary operator in this crate returns
//! `Result<T, ChronoError>`. The variants mirror the error kinds catalogued
//! in the error handling design: malformed input, geometry misuse,
//! dimensionality/SRID mismatches, normal-form violations, and operators
//! reached on a variant that cannot support them.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChronoError>;

/// The error surface of the temporal type engine.
///
/// `statistics_unavailable` (the selectivity estimator falling back to a
/// default) is deliberately not a variant here: it is not fatal, and the
/// estimator returns a plain `f64` rather than a `Result` for that path.
#[derive(Debug, Error)]
pub enum ChronoError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid text representation: {0}")]
    InvalidTextRepresentation(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("dimensionality mismatch: {0}")]
    DimensionalityMismatch(String),

    #[error("SRID mismatch: expected {expected}, got {got}")]
    SridMismatch { expected: i32, got: i32 },

    #[error("normal form violation: {0}")]
    NormalFormViolation(String),

    #[error("operation not supported: {0}")]
    OperationNotSupported(String),
}

impl ChronoError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn normal_form(msg: impl Into<String>) -> Self {
        Self::NormalFormViolation(msg.into())
    }

    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::OperationNotSupported(msg.into())
    }
}
