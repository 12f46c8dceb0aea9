//! AI generation interface.

use async_trait::async_trait;
use thiserror::Error;

use super::{entity::GenerationResult, value_object::ProjectId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generation is not configured: {0}")]
    Unavailable(String),
    #[error("generation request failed: {0}")]
    Request(String),
    #[error("generation service returned status {0}")]
    Status(u16),
    #[error("generation service returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// External capability that turns a prompt into structured output.
///
/// May be slow; callers bound it with a timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        project_id: &ProjectId,
    ) -> Result<GenerationResult, GenerationError>;
}
