//! Thermodynamic model errors.

use thiserror::Error;
use vle_core::CoreError;

/// Result type for thermodynamic operations.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors raised while building substances, curves or chamber conditions.
///
/// Physical invariant breaches during a run (negative liquid, negative volume)
/// are defects and panic instead of surfacing here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Calibration points cannot define a vapor-pressure curve.
    #[error("Invalid calibration: {what}")]
    InvalidCalibration { what: &'static str },

    /// Numeric guard from vle-core.
    #[error(transparent)]
    Core(#[from] CoreError),
}
