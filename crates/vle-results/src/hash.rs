//! Content-based hashing for run IDs.

use sha2::{Digest, Sha256};
use vle_project::ScenarioDef;

pub fn compute_run_id(scenario: &ScenarioDef, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let scenario_json = serde_json::to_string(scenario).unwrap_or_default();
    hasher.update(scenario_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
