//! UseCase: チャットメッセージ処理（AI 呼び出しの仲介）
//!
//! 1 つのチャットイベントは 2 段階で処理される。
//!
//! 1. `execute`: 分類、永続化、ブロードキャスト。AI 宛てなら [`GenerationRequest`] を返す
//! 2. `generate`: 外部の生成サービスを呼び出し、AI の返答を永続化してブロードキャスト
//!
//! `generate` は `execute` のブロードキャスト完了後にしか呼べないため、
//! プロンプトのエコーは必ず AI の返答より先に届く。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() / generate() メソッド
//! - 通常メッセージと AI 宛てメッセージでの配信先の違い
//!
//! ### なぜこのテストが必要か
//! - 通常メッセージは送信者に返さない（クライアント側で描画済み）
//! - AI 宛てメッセージと AI の返答は送信者を含む全員に届く
//! - 生成の失敗は送信者にのみ通知し、ルームの他の参加者には影響しない
//!
//! ### どのような状況を想定しているか
//! - 正常系：通常メッセージ、AI 宛てメッセージと返答
//! - 異常系：生成の失敗・タイムアウト、永続化の失敗
//! - エッジケース：空白のみのメッセージ、マーカーのみのメッセージ

use std::{sync::Arc, time::Duration};

use collab_shared::time::Clock;

use crate::domain::{
    AiGenerator, Connection, ConnectionId, Message, MessageId, MessagePusher, MessageRepository,
    NewMessage, RoomRegistry, ServerEvent, Timestamp,
};

use super::error::SendMessageError;

/// AI 宛てメッセージを示すマーカー（大文字小文字は区別しない）
pub const AI_MARKER: &str = "@ai";

/// メッセージ中のどこかにマーカーが含まれていれば AI 宛て
pub fn is_ai_targeted(text: &str) -> bool {
    text.to_ascii_lowercase().contains(AI_MARKER)
}

/// マーカーを全て取り除き、前後の空白を削ったプロンプトを返す
pub fn strip_ai_marker(text: &str) -> String {
    let marker = AI_MARKER.as_bytes();
    let bytes = text.as_bytes();
    let mut prompt = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i + marker.len() <= bytes.len() {
        if bytes[i..i + marker.len()].eq_ignore_ascii_case(marker) {
            prompt.push_str(&text[copied..i]);
            i += marker.len();
            copied = i;
        } else {
            i += 1;
        }
    }
    prompt.push_str(&text[copied..]);

    prompt.trim().to_string()
}

/// `execute` の結果
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// 通常メッセージとして配信済み
    Delivered(Message),
    /// プロンプトのエコーを配信済み、生成待ち
    AwaitingGeneration(GenerationRequest),
}

/// 生成待ちのプロンプト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// エコー済みのプロンプトメッセージの ID
    pub prompt_message_id: MessageId,
    /// マーカーを取り除いたプロンプト
    pub prompt: String,
}

/// チャットメッセージ処理のユースケース
pub struct SendMessageUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    /// Repository（メッセージの永続化、挿入のみ）
    messages: Arc<dyn MessageRepository>,
    generator: Arc<dyn AiGenerator>,
    clock: Arc<dyn Clock>,
    generation_timeout: Duration,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        messages: Arc<dyn MessageRepository>,
        generator: Arc<dyn AiGenerator>,
        clock: Arc<dyn Clock>,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            messages,
            generator,
            clock,
            generation_timeout,
        }
    }

    /// チャットメッセージを受け付ける
    ///
    /// 失敗した場合はエラーを送信元の接続にのみ通知してから返す。
    ///
    /// # Returns
    ///
    /// * `Ok(ChatOutcome::Delivered)` - 通常メッセージを送信者以外に配信した
    /// * `Ok(ChatOutcome::AwaitingGeneration)` - AI 宛てメッセージを全員に配信した
    /// * `Err(SendMessageError)` - 永続化または配信に失敗した
    pub async fn execute(
        &self,
        connection: &Connection,
        text: String,
    ) -> Result<ChatOutcome, SendMessageError> {
        let result = self.accept(connection, text).await;
        if let Err(e) = &result {
            tracing::warn!("Rejected message from '{}': {:?}", connection.id, e);
            self.notify_error(&connection.id, &e.to_string()).await;
        }
        result
    }

    /// AI の返答を生成し、全員に配信する
    ///
    /// 呼び出しは 1 回のみで、リトライはしない。プロンプトが空の場合は生成サービスを呼ばない。
    /// 失敗・タイムアウトは送信元の接続にのみ通知する（エコー済みのプロンプトはそのまま残る）。
    pub async fn generate(
        &self,
        connection: &Connection,
        request: GenerationRequest,
    ) -> Result<Message, SendMessageError> {
        let result = self.respond(connection, request).await;
        if let Err(e) = &result {
            tracing::warn!("Generation for '{}' failed: {:?}", connection.id, e);
            self.notify_error(&connection.id, &e.to_string()).await;
        }
        result
    }

    /// 特定の接続にエラーを通知する
    pub async fn notify_error(&self, connection_id: &ConnectionId, message: &str) {
        if let Err(e) = self
            .message_pusher
            .push_to(connection_id, &ServerEvent::error(message))
            .await
        {
            tracing::warn!("Failed to deliver error to '{}': {}", connection_id, e);
        }
    }

    async fn accept(
        &self,
        connection: &Connection,
        text: String,
    ) -> Result<ChatOutcome, SendMessageError> {
        let context = &connection.context;
        let now = Timestamp::new(self.clock.now_millis());

        if !is_ai_targeted(&text) {
            let new_message =
                NewMessage::plain(context.project_id.clone(), context.identity.clone(), text, now);
            let message = self.persist(new_message).await?;

            // 送信者以外に配信
            let targets = self
                .registry
                .connections_of(&context.room_id)
                .await
                .into_iter()
                .filter(|id| *id != connection.id)
                .collect();
            self.broadcast(targets, &message).await?;
            return Ok(ChatOutcome::Delivered(message));
        }

        let prompt = strip_ai_marker(&text);
        let new_message =
            NewMessage::ai_targeted(context.project_id.clone(), context.identity.clone(), text, now);
        let message = self.persist(new_message).await?;

        // 送信者の他のタブも含めて全員に配信
        let targets = self.registry.connections_of(&context.room_id).await;
        self.broadcast(targets, &message).await?;

        Ok(ChatOutcome::AwaitingGeneration(GenerationRequest {
            prompt_message_id: message.id,
            prompt,
        }))
    }

    async fn respond(
        &self,
        connection: &Connection,
        request: GenerationRequest,
    ) -> Result<Message, SendMessageError> {
        let context = &connection.context;

        // マーカーのみのメッセージはエコー済み、生成は行わない
        if request.prompt.is_empty() {
            return Err(SendMessageError::EmptyPrompt);
        }

        let generated = tokio::time::timeout(
            self.generation_timeout,
            self.generator.generate(&request.prompt, &context.project_id),
        )
        .await
        .map_err(|_| SendMessageError::GenerationTimedOut)?
        .map_err(SendMessageError::GenerationFailed)?;

        let new_message = NewMessage::ai_response(
            context.project_id.clone(),
            request.prompt,
            generated,
            Timestamp::new(self.clock.now_millis()),
        );
        let message = self.persist(new_message).await?;

        let targets = self.registry.connections_of(&context.room_id).await;
        self.broadcast(targets, &message).await?;

        tracing::info!(
            "AI replied to '{}' in room '{}'",
            request.prompt_message_id,
            context.room_id
        );
        Ok(message)
    }

    async fn persist(&self, new_message: NewMessage) -> Result<Message, SendMessageError> {
        let id = self
            .messages
            .insert(&new_message)
            .await
            .map_err(SendMessageError::Persistence)?;
        Ok(new_message.persisted(id))
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        message: &Message,
    ) -> Result<(), SendMessageError> {
        self.message_pusher
            .broadcast(targets, &ServerEvent::ChatMessage(message.clone()))
            .await
            .map_err(SendMessageError::Broadcast)
    }
}
