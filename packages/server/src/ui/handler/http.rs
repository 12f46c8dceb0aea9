//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::{
    infrastructure::dto::{
        http::{ErrorResponseDto, RoomSummaryDto},
        websocket::ChatMessage,
    },
    ui::state::AppState,
    usecase::{AdmissionError, GetMessagesError},
};

use super::authorization_header;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Active rooms of the caller's projects with their presence
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomSummaryDto>>, (StatusCode, Json<ErrorResponseDto>)> {
    match state
        .get_rooms_usecase
        .execute(authorization_header(&headers))
        .await
    {
        // Domain Model から DTO への変換
        Ok(rooms) => Ok(Json(rooms.iter().map(RoomSummaryDto::from).collect())),
        Err(e) => {
            let status = admission_status(&e);
            if status.is_server_error() {
                tracing::error!("Failed to list rooms: {:?}", e);
            } else {
                tracing::warn!("Rejected rooms request: {}", e);
            }
            Err((
                status,
                Json(ErrorResponseDto {
                    message: e.to_string(),
                }),
            ))
        }
    }
}

/// Persisted history of a project, oldest first
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<ChatMessage>>, (StatusCode, Json<ErrorResponseDto>)> {
    match state
        .get_messages_usecase
        .execute(Some(&project_id), authorization_header(&headers))
        .await
    {
        Ok(messages) => Ok(Json(messages.iter().map(ChatMessage::from).collect())),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!("Failed to load messages for '{}': {:?}", project_id, e);
            } else {
                tracing::warn!("Rejected history request for '{}': {}", project_id, e);
            }
            Err((
                status,
                Json(ErrorResponseDto {
                    message: e.to_string(),
                }),
            ))
        }
    }
}

fn status_for(error: &GetMessagesError) -> StatusCode {
    match error {
        GetMessagesError::Admission(e) => admission_status(e),
        GetMessagesError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn admission_status(error: &AdmissionError) -> StatusCode {
    match error {
        AdmissionError::InvalidProjectId => StatusCode::BAD_REQUEST,
        AdmissionError::MissingToken | AdmissionError::InvalidToken | AdmissionError::UserNotFound => {
            StatusCode::UNAUTHORIZED
        }
        AdmissionError::ProjectNotFound => StatusCode::NOT_FOUND,
        AdmissionError::NotAuthorized => StatusCode::FORBIDDEN,
        AdmissionError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RepositoryError;

    #[test]
    fn test_status_mapping() {
        let cases: [(GetMessagesError, StatusCode); 8] = [
            (AdmissionError::InvalidProjectId.into(), StatusCode::BAD_REQUEST),
            (AdmissionError::MissingToken.into(), StatusCode::UNAUTHORIZED),
            (AdmissionError::InvalidToken.into(), StatusCode::UNAUTHORIZED),
            (AdmissionError::UserNotFound.into(), StatusCode::UNAUTHORIZED),
            (AdmissionError::ProjectNotFound.into(), StatusCode::NOT_FOUND),
            (AdmissionError::NotAuthorized.into(), StatusCode::FORBIDDEN),
            (AdmissionError::Internal.into(), StatusCode::INTERNAL_SERVER_ERROR),
            (
                GetMessagesError::Repository(RepositoryError::Unavailable("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(status_for(&error), expected, "{:?}", error);
        }
    }
}
