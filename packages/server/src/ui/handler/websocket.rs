//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{AuthContext, Connection, SessionId},
    infrastructure::dto::websocket::{ChatMessageRequest, MessageType},
    ui::state::AppState,
    usecase::{AdmissionError, ChatOutcome, parse_project_id},
};

use super::{authorization_header, generation_tasks::GenerationTasks};

const INVALID_MESSAGE_FORMAT: &str = "Invalid message format";

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectQuery {
    pub project_id: Option<String>,
    /// Used when the `Authorization` header is absent (browsers cannot set it on upgrade)
    pub token: Option<String>,
    /// Session id from a previous connection, for recovery
    pub session_id: Option<String>,
}

/// Admission runs before the upgrade; a rejected client still gets the upgrade
/// followed by a policy-violation close carrying the reason.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let credential = authorization_header(&headers).or(query.token.as_deref());
    let admission = admit(&state, &query, credential).await;

    ws.on_upgrade(move |socket| async move {
        match admission {
            Ok(context) => handle_socket(socket, state, context).await,
            Err(reason) => reject_socket(socket, reason).await,
        }
    })
}

async fn admit(
    state: &AppState,
    query: &ConnectQuery,
    credential: Option<&str>,
) -> Result<AuthContext, AdmissionError> {
    let session_id = query.session_id.as_deref().and_then(SessionId::parse);
    let project_id = parse_project_id(query.project_id.as_deref()).ok();
    if let (Some(session_id), Some(project_id)) = (session_id, project_id)
        && let Some(context) = state
            .session_recovery
            .recover(&session_id, &project_id)
            .await
    {
        tracing::info!(
            "Recovered session '{}' for '{}'",
            session_id,
            context.identity
        );
        return Ok(context);
    }

    state
        .authenticate_session_usecase
        .execute(query.project_id.as_deref(), credential)
        .await
}

async fn reject_socket(mut socket: WebSocket, reason: AdmissionError) {
    tracing::warn!("Rejected connection: {}", reason);
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: reason.to_string().into(),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}

/// Forwards frames from the connection's channel to the socket and pings on every tick.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    ping_interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ping_interval);
        // 初回の tick は即座に完了する
        ticker.tick().await;

        loop {
            tokio::select! {
                frame = rx.recv() => {
                    let Some(frame) = frame else { break };
                    if sender.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if sender.send(Message::Ping(Default::default())).await.is_err() {
                        break;
                    }
                }
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, context: AuthContext) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let connection = state.connect_participant_usecase.execute(context, tx).await;
    tracing::info!(
        "Connection '{}' opened for '{}' in '{}'",
        connection.id,
        connection.context.identity,
        connection.context.room_id
    );

    let mut send_task = pusher_loop(rx, sender, state.heartbeat.ping_interval);
    let mut generations = GenerationTasks::new();

    tokio::select! {
        _ = receive_loop(&mut receiver, &state, &connection, &mut generations) => send_task.abort(),
        _ = &mut send_task => {},
    };

    // 実行中の生成は完了まで走らせ、ルームに配信させる
    generations.detach();

    state
        .disconnect_participant_usecase
        .execute(&connection)
        .await;
    state
        .session_recovery
        .remember(connection.session_id, connection.context.clone())
        .await;

    tracing::info!("Connection '{}' closed", connection.id);
}

async fn receive_loop(
    receiver: &mut SplitStream<WebSocket>,
    state: &Arc<AppState>,
    connection: &Connection,
    generations: &mut GenerationTasks,
) {
    let ping_timeout = state.heartbeat.ping_timeout;

    loop {
        let msg = match tokio::time::timeout(ping_timeout, receiver.next()).await {
            Ok(Some(Ok(msg))) => msg,
            Ok(Some(Err(e))) => {
                tracing::warn!("WebSocket error on '{}': {}", connection.id, e);
                break;
            }
            Ok(None) => break,
            Err(_) => {
                tracing::info!("Connection '{}' timed out", connection.id);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                handle_text(state, connection, generations, text.as_str()).await;
            }
            Message::Binary(_) => {
                state
                    .send_message_usecase
                    .notify_error(&connection.id, INVALID_MESSAGE_FORMAT)
                    .await;
            }
            Message::Ping(_) | Message::Pong(_) => {
                tracing::trace!("Heartbeat from '{}'", connection.id);
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection.id);
                break;
            }
        }
    }
}

async fn handle_text(
    state: &Arc<AppState>,
    connection: &Connection,
    generations: &mut GenerationTasks,
    text: &str,
) {
    let request = match serde_json::from_str::<ChatMessageRequest>(text) {
        Ok(request) if request.r#type == MessageType::ChatMessage => request,
        _ => {
            tracing::warn!("Invalid frame from '{}'", connection.id);
            state
                .send_message_usecase
                .notify_error(&connection.id, INVALID_MESSAGE_FORMAT)
                .await;
            return;
        }
    };

    // エラーは UseCase が送信元に通知済み
    let Ok(outcome) = state
        .send_message_usecase
        .execute(connection, request.message)
        .await
    else {
        return;
    };

    if let ChatOutcome::AwaitingGeneration(generation) = outcome {
        let state = state.clone();
        let connection = connection.clone();
        generations.spawn(generation.prompt_message_id.clone(), async move {
            let _ = state
                .send_message_usecase
                .generate(&connection, generation)
                .await;
        });
    }
}
