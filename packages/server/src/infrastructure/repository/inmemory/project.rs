//! InMemory Project Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Project, ProjectId, ProjectRepository, RepositoryError};

pub struct InMemoryProjectRepository {
    projects: Mutex<HashMap<ProjectId, Project>>,
}

impl InMemoryProjectRepository {
    pub fn new(projects: Vec<Project>) -> Self {
        let projects = projects
            .into_iter()
            .map(|project| (project.id.clone(), project))
            .collect();
        Self {
            projects: Mutex::new(projects),
        }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError> {
        let projects = self.projects.lock().await;
        Ok(projects.get(id).cloned())
    }
}
