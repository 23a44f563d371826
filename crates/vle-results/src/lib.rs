//! vle-results: run recording, cache and per-step snapshot storage.

pub mod hash;
pub mod query;
pub mod recorder;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use query::{
    RunSummary, extract_chamber_series, extract_substance_series, list_chambers,
    list_substances, run_summary,
};
pub use recorder::{RecordedRun, ensure_run, record_scenario};
pub use store::{RunStore, StepWriter};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    #[error("Unknown {kind}: {name}")]
    UnknownEntity { kind: &'static str, name: String },

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("No records in run")]
    EmptyRun,

    #[error("Scenario error: {0}")]
    Project(#[from] vle_project::ProjectError),

    #[error("Solver error: {0}")]
    Solver(#[from] vle_solver::SolverError),
}
