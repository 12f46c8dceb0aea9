//! RoomRegistry trait 定義
//!
//! 「誰がどのルームにいるか」の唯一の情報源。
//! 一人のユーザーが複数の接続（ブラウザのタブなど）を持ちうるため、
//! Presence は必ずこのレジストリから求め、トランスポート層の情報から直接求めてはならない。

use async_trait::async_trait;

use super::{
    entity::Presence,
    value_object::{ConnectionId, Identity, RoomId},
};

/// Room Registry trait
///
/// 各操作はロックを保持したまま一度に完了し、途中で中断されない。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// 接続をルームに追加（ルームが無ければ作成）
    async fn join(&self, room_id: &RoomId, identity: &Identity, connection_id: ConnectionId);

    /// 接続をルームから削除
    ///
    /// 最後の接続が抜けたユーザーは Presence から外れ、空になったルームは削除される。
    /// 接続が登録されていなかった場合は `false` を返す。
    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool;

    /// ルームの Presence（重複なし）
    async fn members_of(&self, room_id: &RoomId) -> Presence;

    /// ルームに接続中の全ての接続 ID（スナップショット）
    async fn connections_of(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// アクティブな全ルームの Presence
    async fn rooms(&self) -> Vec<Presence>;
}
