//! AiGenerator 実装
//!
//! - `http`: OpenAI 互換の chat-completions エンドポイントを呼び出す実装
//! - `unavailable`: API キー未設定時に常に失敗する実装

pub mod http;
pub mod unavailable;

pub use http::HttpAiGenerator;
pub use unavailable::UnavailableAiGenerator;
