//! Domain errors.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("invalid project id: '{0}'")]
    InvalidProjectId(String),
    #[error("identity must not be empty")]
    EmptyIdentity,
}

/// Errors raised by the backing stores
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage rejected the record: {0}")]
    Rejected(String),
}
