//! メッセージ送信（通知）の実装
//!
//! ## 実装
//!
//! - `websocket`: WebSocket を使った実装
//! - 将来的に: 複数プロセス間の pub/sub（`redis` など）

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
