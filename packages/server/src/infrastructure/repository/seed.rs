//! 起動時に読み込むユーザー・プロジェクトのフィクスチャ
//!
//! ```json
//! {
//!   "users": [{ "email": "alice@x.com", "name": "Alice" }],
//!   "projects": [{ "id": "65f1a2b3c4d5e6f7a8b9c0d1", "name": "demo", "members": ["alice@x.com"] }]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Identity, Project, ProjectId, User, ValueObjectError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid seed record: {0}")]
    Invalid(#[from] ValueObjectError),
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub projects: Vec<SeedProject>,
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedProject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl SeedData {
    pub async fn load(path: &Path) -> Result<Self, SeedError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// ドメインモデルへ変換（不正な ID やメールアドレスはエラー）
    pub fn into_records(self) -> Result<(Vec<User>, Vec<Project>), SeedError> {
        let users = self
            .users
            .into_iter()
            .map(|u| {
                Ok(User {
                    email: Identity::new(u.email)?,
                    name: u.name,
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;

        let projects = self
            .projects
            .into_iter()
            .map(|p| {
                let members = p
                    .members
                    .into_iter()
                    .map(Identity::new)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Project {
                    id: ProjectId::new(p.id)?,
                    name: p.name,
                    members,
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;

        Ok((users, projects))
    }
}
