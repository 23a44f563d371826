//! Result data types.

use serde::{Deserialize, Serialize};
use vle_solver::{StepReport, SystemSnapshot};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_name: String,
    pub timestamp: String,
    pub solver_version: String,
    pub initial_temperature_k: f64,
    pub target_temperature_k: f64,
    pub steps: usize,
    pub non_converged_steps: usize,
    pub unbalanced_steps: usize,
}

/// State after one temperature step; step 0 is the initial state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    pub temperature_k: f64,
    pub iterations: usize,
    pub converged: bool,
    pub pressure_balanced: bool,
    pub snapshot: SystemSnapshot,
}

impl StepRecord {
    pub fn initial(snapshot: SystemSnapshot, pressure_balanced: bool) -> Self {
        Self {
            step: 0,
            temperature_k: snapshot.temperature_k,
            iterations: 0,
            converged: snapshot.chambers.iter().all(|c| c.at_equilibrium),
            pressure_balanced,
            snapshot,
        }
    }

    pub fn from_report(step: usize, report: &StepReport, snapshot: SystemSnapshot) -> Self {
        Self {
            step,
            temperature_k: report.temperature_k,
            iterations: report.iterations,
            converged: report.converged,
            pressure_balanced: report.pressure_balanced,
            snapshot,
        }
    }
}
