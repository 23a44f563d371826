//! Error types for solver operations.

use thiserror::Error;
use vle_core::CoreError;
use vle_thermo::ThermoError;

/// Errors that can occur while setting up or stepping the solver.
///
/// Running out of iterations is not an error; see [`crate::StepReport`].
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Thermo error: {0}")]
    Thermo(#[from] ThermoError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] CoreError),
}

pub type SolverResult<T> = Result<T, SolverError>;
