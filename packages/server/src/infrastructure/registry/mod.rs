//! RoomRegistry 実装
//!
//! - `inmemory`: 単一プロセス用の実装
//! - 将来的に: 複数プロセスで共有する KVS 実装

pub mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
