//! InMemory RoomRegistry 実装
//!
//! ## 構造
//!
//! ```text
//! RoomId → { ConnectionId → Identity }
//! ```
//!
//! Presence は接続マップの値を重複排除して求める。
//! 同じユーザーの接続が残っている限り、そのユーザーは Presence に残る。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Identity, Presence, RoomId, RoomRegistry};

#[derive(Default)]
struct RoomEntry {
    connections: HashMap<ConnectionId, Identity>,
}

/// プロセス内のルーム一覧
///
/// 各操作は 1 回のロック内で完了する。ルームは最初の join で作られ、最後の leave で消える。
#[derive(Default)]
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<RoomId, RoomEntry>>,
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録されているルーム数
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, room_id: &RoomId, identity: &Identity, connection_id: ConnectionId) {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_id.clone())
            .or_default()
            .connections
            .insert(connection_id, identity.clone());
        tracing::debug!(
            "Connection '{}' ({}) joined room '{}'",
            connection_id,
            identity,
            room_id
        );
    }

    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(entry) = rooms.get_mut(room_id) else {
            return false;
        };

        let removed = entry.connections.remove(connection_id).is_some();
        if entry.connections.is_empty() {
            rooms.remove(room_id);
            tracing::debug!("Room '{}' is empty and was removed", room_id);
        }
        removed
    }

    async fn members_of(&self, room_id: &RoomId) -> Presence {
        let rooms = self.rooms.lock().await;
        let users = rooms
            .get(room_id)
            .map(|entry| entry.connections.values().cloned().collect())
            .unwrap_or_default();
        Presence::new(room_id.clone(), users)
    }

    async fn connections_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|entry| entry.connections.keys().copied().collect())
            .unwrap_or_default()
    }

    async fn rooms(&self) -> Vec<Presence> {
        let rooms = self.rooms.lock().await;
        let mut presences: Vec<Presence> = rooms
            .iter()
            .map(|(room_id, entry)| {
                Presence::new(room_id.clone(), entry.connections.values().cloned().collect())
            })
            .collect();
        presences.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        presences
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectId;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - Presence が「接続が 1 つ以上あるユーザー」の重複なし集合と一致すること
    // - 同一ユーザーの複数接続（複数タブ）の扱い
    // - 最後の接続が抜けたルームが削除されること
    // ========================================

    fn room(hex: char) -> RoomId {
        ProjectId::new(hex.to_string().repeat(24)).unwrap().room_id()
    }

    fn identity(value: &str) -> Identity {
        Identity::new(value.to_string()).unwrap()
    }

    fn names(presence: &Presence) -> Vec<&str> {
        presence.users.iter().map(|u| u.as_str()).collect()
    }

    #[tokio::test]
    async fn test_join_creates_room_lazily() {
        // テスト項目: 最初の join でルームが作成される
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let p1 = room('a');
        assert_eq!(registry.room_count().await, 0);

        // when (操作):
        registry
            .join(&p1, &identity("alice@x.com"), ConnectionId::generate())
            .await;

        // then (期待する結果):
        assert_eq!(registry.room_count().await, 1);
        assert_eq!(names(&registry.members_of(&p1).await), vec!["alice@x.com"]);
    }

    #[tokio::test]
    async fn test_multiple_tabs_count_once_in_presence() {
        // テスト項目: 同一ユーザーの 2 接続は接続数を 2 増やすが Presence は 1 人
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let p1 = room('a');
        let alice = identity("alice@x.com");

        // when (操作):
        registry.join(&p1, &alice, ConnectionId::generate()).await;
        registry.join(&p1, &alice, ConnectionId::generate()).await;

        // then (期待する結果):
        assert_eq!(registry.connections_of(&p1).await.len(), 2);
        assert_eq!(registry.members_of(&p1).await.count(), 1);
    }

    #[tokio::test]
    async fn test_leave_keeps_identity_with_remaining_connection() {
        // テスト項目: 片方のタブを閉じても、もう片方が残っていればユーザーは Presence に残る
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let p1 = room('a');
        let alice = identity("alice@x.com");
        let tab1 = ConnectionId::generate();
        let tab2 = ConnectionId::generate();
        registry.join(&p1, &alice, tab1).await;
        registry.join(&p1, &alice, tab2).await;

        // when (操作):
        let removed = registry.leave(&p1, &tab1).await;

        // then (期待する結果):
        assert!(removed);
        assert_eq!(names(&registry.members_of(&p1).await), vec!["alice@x.com"]);
        assert_eq!(registry.connections_of(&p1).await, vec![tab2]);
    }

    #[tokio::test]
    async fn test_last_leave_removes_room() {
        // テスト項目: 全ての接続が抜けるとルームはレジストリから消える
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let p1 = room('a');
        let alice_conn = ConnectionId::generate();
        let bob_conn = ConnectionId::generate();
        registry.join(&p1, &identity("alice@x.com"), alice_conn).await;
        registry.join(&p1, &identity("bob@x.com"), bob_conn).await;

        // when (操作):
        registry.leave(&p1, &alice_conn).await;
        let after_alice = registry.members_of(&p1).await;
        registry.leave(&p1, &bob_conn).await;

        // then (期待する結果):
        assert_eq!(names(&after_alice), vec!["bob@x.com"]);
        assert_eq!(registry.room_count().await, 0);
        assert!(registry.members_of(&p1).await.is_empty());
        assert!(registry.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_leave_unknown_connection_is_noop() {
        // テスト項目: 未登録の接続や存在しないルームからの leave は false を返すだけ
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let p1 = room('a');
        let p2 = room('b');
        registry
            .join(&p1, &identity("alice@x.com"), ConnectionId::generate())
            .await;

        // when (操作):
        let unknown_conn = registry.leave(&p1, &ConnectionId::generate()).await;
        let unknown_room = registry.leave(&p2, &ConnectionId::generate()).await;

        // then (期待する結果):
        assert!(!unknown_conn);
        assert!(!unknown_room);
        assert_eq!(registry.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        // テスト項目: ルームごとに Presence が独立している
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let p1 = room('a');
        let p2 = room('b');

        // when (操作):
        registry
            .join(&p1, &identity("alice@x.com"), ConnectionId::generate())
            .await;
        registry
            .join(&p2, &identity("bob@x.com"), ConnectionId::generate())
            .await;

        // then (期待する結果):
        let rooms = registry.rooms().await;
        assert_eq!(rooms.len(), 2);
        assert_eq!(names(&rooms[0]), vec!["alice@x.com"]);
        assert_eq!(names(&rooms[1]), vec!["bob@x.com"]);
    }
}
