//! Request handlers.

mod generation_tasks;
mod http;
mod websocket;

use axum::http::{HeaderMap, header};

pub use http::{get_messages, get_rooms, health_check};
pub use websocket::websocket_handler;

/// Raw `Authorization` header value, if present and valid UTF-8
fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}
