use async_trait::async_trait;

use crate::domain::{AiGenerator, GenerationError, GenerationResult, ProjectId};

/// Stand-in used when no generation back-end is configured.
pub struct UnavailableAiGenerator;

#[async_trait]
impl AiGenerator for UnavailableAiGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _project_id: &ProjectId,
    ) -> Result<GenerationResult, GenerationError> {
        Err(GenerationError::Unavailable(
            "no AI API key configured".to_string(),
        ))
    }
}
