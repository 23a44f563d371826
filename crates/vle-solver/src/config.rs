//! Solver tunables.

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Width (Pa) of the band around the mean pressure that counts as balanced
    pub max_p_diff_in_rooms: f64,
    /// Moles moved between phases per adjustment
    pub delta_n_in_adjust: f64,
    /// Iteration cap for each relaxation loop
    pub max_iter: usize,
    /// Run the per-chamber phase adjustment on the rayon pool
    pub parallel_phase_adjust: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_p_diff_in_rooms: 100.0,
            delta_n_in_adjust: 0.01,
            max_iter: 100,
            parallel_phase_adjust: false,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if !(self.max_p_diff_in_rooms.is_finite() && self.max_p_diff_in_rooms > 0.0) {
            return Err(SolverError::InvalidArg {
                what: "max_p_diff_in_rooms must be positive",
            });
        }
        if !(self.delta_n_in_adjust.is_finite() && self.delta_n_in_adjust > 0.0) {
            return Err(SolverError::InvalidArg {
                what: "delta_n_in_adjust must be positive",
            });
        }
        if self.max_iter == 0 {
            return Err(SolverError::InvalidArg {
                what: "max_iter must be positive",
            });
        }
        Ok(())
    }

    /// Half-width of the balanced band.
    pub fn pressure_band(&self) -> f64 {
        self.max_p_diff_in_rooms / 2.0
    }
}
