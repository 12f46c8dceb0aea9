//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Active room summary for `GET /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub room_id: String,
    pub users: Vec<String>,
    pub count: usize,
}

/// Error body: `{"message": reason}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub message: String,
}
