//! The server's own model of the hierarchy and the results of ORT runs.

pub mod advisor;
pub mod evaluator;
pub mod hierarchy;
pub mod reporter;
pub mod runs;
pub mod scanner;

pub use hierarchy::*;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("unknown repository type: '{0}'")]
    UnknownRepositoryType(String),
    #[error("unknown severity: '{0}'")]
    UnknownSeverity(String),
    #[error("unknown run status: '{0}'")]
    UnknownRunStatus(String),
}
