use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed request: {reason}")]
    MalformedRequest { reason: String },

    #[error("No plan available")]
    NoPlanAvailable,

    #[error("Execution in progress")]
    ExecutionInProgress,

    #[error("Planning backend error: {0}")]
    Backend(String),

    #[error("Trajectory display error: {0}")]
    Display(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
