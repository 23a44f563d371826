use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Scenario error: {0}")]
    Project(#[from] vle_project::ProjectError),

    #[error("Results error: {0}")]
    Results(#[from] vle_results::ResultsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },
}

pub type CliResult<T> = Result<T, CliError>;
