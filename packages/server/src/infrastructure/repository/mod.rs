//! Repository 実装
//!
//! - `inmemory`: HashMap / Vec をストレージとして使う実装
//! - `seed`: 起動時に読み込む JSON フィクスチャ

pub mod inmemory;
pub mod seed;

pub use inmemory::{InMemoryMessageRepository, InMemoryProjectRepository, InMemoryUserRepository};
pub use seed::{SeedData, SeedError};
