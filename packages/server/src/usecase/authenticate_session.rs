//! UseCase: 接続の認証
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AuthenticateSessionUseCase::execute() メソッド
//! - 接続時の検証の順序と、各拒否理由の文字列
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーであるユーザーの接続
//! - 異常系：不正なプロジェクト ID、トークンなし、不正・期限切れトークン、
//!   未登録ユーザー、存在しないプロジェクト、メンバーでないユーザー、ストア障害

use std::sync::Arc;

use crate::domain::{
    AuthContext, CredentialVerifier, ProjectId, ProjectRepository, User, UserRepository,
};

use super::error::AdmissionError;

const BEARER_PREFIX: &str = "Bearer ";

/// プロジェクト ID の形式チェック（ストア検索の前に行う）
pub fn parse_project_id(raw: Option<&str>) -> Result<ProjectId, AdmissionError> {
    raw.and_then(|raw| ProjectId::new(raw.to_string()).ok())
        .ok_or(AdmissionError::InvalidProjectId)
}

/// 接続認証のユースケース
///
/// 検証は接続時に 1 回だけ行い、メッセージごとには再評価しない。
pub struct AuthenticateSessionUseCase {
    verifier: Arc<dyn CredentialVerifier>,
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn ProjectRepository>,
}

impl AuthenticateSessionUseCase {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            verifier,
            users,
            projects,
        }
    }

    /// 認証を実行
    ///
    /// # Arguments
    ///
    /// * `raw_project_id` - 接続先プロジェクトの ID（未検証の文字列）
    /// * `credential` - トークン（"Bearer " 付きでもよい）
    ///
    /// # Returns
    ///
    /// * `Ok(AuthContext)` - 接続に紐づける認証結果
    /// * `Err(AdmissionError)` - 拒否理由
    pub async fn execute(
        &self,
        raw_project_id: Option<&str>,
        credential: Option<&str>,
    ) -> Result<AuthContext, AdmissionError> {
        // 1. プロジェクト ID の形式
        let project_id = parse_project_id(raw_project_id)?;

        // 2-4. トークンとユーザー
        let user = self.identify(credential).await?;

        // 5. プロジェクトとメンバー
        let project = self
            .projects
            .find_by_id(&project_id)
            .await
            .map_err(|e| {
                tracing::error!("Project lookup failed: {}", e);
                AdmissionError::Internal
            })?
            .ok_or(AdmissionError::ProjectNotFound)?;

        if !project.has_member(&user.email) {
            return Err(AdmissionError::NotAuthorized);
        }

        Ok(AuthContext::new(&user, &project))
    }

    /// トークンを検証し、登録済みのユーザーを返す（プロジェクトは問わない）
    pub async fn identify(&self, credential: Option<&str>) -> Result<User, AdmissionError> {
        // "Bearer " は取り除く
        let token = credential
            .map(|c| c.strip_prefix(BEARER_PREFIX).unwrap_or(c).trim())
            .filter(|t| !t.is_empty())
            .ok_or(AdmissionError::MissingToken)?;

        // 署名と有効期限
        let identity = self.verifier.verify(token).map_err(|e| {
            tracing::debug!("Credential rejected: {}", e);
            AdmissionError::InvalidToken
        })?;

        self.users
            .find_by_email(&identity)
            .await
            .map_err(|e| {
                tracing::error!("User lookup failed: {}", e);
                AdmissionError::Internal
            })?
            .ok_or(AdmissionError::UserNotFound)
    }
}
