//! Credential verification interface.

use thiserror::Error;

use super::value_object::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("credential expired")]
    Expired,
    #[error("credential rejected: {0}")]
    Invalid(String),
}

/// Verifies a bearer credential (signature and expiry) and names its owner.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, CredentialError>;
}
