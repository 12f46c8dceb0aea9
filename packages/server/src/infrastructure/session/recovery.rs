//! 接続状態の復元
//!
//! 切断された接続の認証結果を一定時間（既定 2 分）保持し、
//! 同じセッション ID で再接続してきたクライアントを再認証なしで受け入れる。
//! セッション ID は 1 回限り有効。

use std::{collections::HashMap, sync::Arc, time::Duration};

use collab_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{AuthContext, ProjectId, SessionId};

struct RecoverableSession {
    context: AuthContext,
    expires_at: i64,
}

pub struct SessionRecoveryStore {
    window_millis: i64,
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<SessionId, RecoverableSession>>,
}

impl SessionRecoveryStore {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window_millis: i64::try_from(window.as_millis()).unwrap_or(i64::MAX),
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// 切断された接続の認証結果を保持（期限切れのものは同時に破棄）
    pub async fn remember(&self, session_id: SessionId, context: AuthContext) {
        if self.window_millis == 0 {
            return;
        }
        let now = self.clock.now_millis();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(
            session_id,
            RecoverableSession {
                context,
                expires_at: now.saturating_add(self.window_millis),
            },
        );
    }

    /// 保持中の認証結果を取り出す
    ///
    /// 期限切れ、または別プロジェクトへの再接続の場合は `None`。
    pub async fn recover(&self, session_id: &SessionId, project_id: &ProjectId) -> Option<AuthContext> {
        let now = self.clock.now_millis();
        let session = self.sessions.lock().await.remove(session_id)?;
        if session.expires_at <= now || &session.context.project_id != project_id {
            return None;
        }
        Some(session.context)
    }

    /// 保持中のセッション数
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
