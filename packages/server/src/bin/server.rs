//! Real-time collaboration server.
//!
//! Run with:
//! ```not_rust
//! SECRET_KEY=dev cargo run --bin collab-server -- --seed-file seed.json
//! cargo run --bin collab-server -- --jwt-secret dev --issue-token-for alice@x.com
//! ```

use std::sync::Arc;

use clap::Parser;
use collab_server::{
    config::ServerArgs,
    domain::{AiGenerator, Identity, Project, User},
    infrastructure::{
        auth::JwtCredentialVerifier,
        generator::{HttpAiGenerator, UnavailableAiGenerator},
        message_pusher::WebSocketMessagePusher,
        registry::InMemoryRoomRegistry,
        repository::{
            InMemoryMessageRepository, InMemoryProjectRepository, InMemoryUserRepository,
            SeedData,
        },
        session::SessionRecoveryStore,
    },
    ui::{AppState, Server},
    usecase::{
        AuthenticateSessionUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetMessagesUseCase, GetRoomsUseCase, PresenceLock, SendMessageUseCase,
    },
};
use collab_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    // .env は任意
    let _ = dotenvy::dotenv();
    let args = ServerArgs::parse();

    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = run(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let verifier = Arc::new(JwtCredentialVerifier::new(args.jwt_secret.as_bytes()));

    if let Some(email) = &args.issue_token_for {
        let identity = Identity::new(email.clone())?;
        let token = verifier.issue_token(&identity, chrono::Duration::hours(24))?;
        println!("{}", token);
        return Ok(());
    }

    // Initialize dependencies in order:
    // 1. Repositories and registry
    // 2. MessagePusher and AI generator
    // 3. UseCases
    // 4. Server

    // 1. Repositories (in-memory, seeded from a fixture)
    let (users, projects): (Vec<User>, Vec<Project>) = match &args.seed_file {
        Some(path) => SeedData::load(path).await?.into_records()?,
        None => {
            tracing::warn!("No seed file given; every connection will be rejected");
            (Vec::new(), Vec::new())
        }
    };
    tracing::info!(
        "Loaded {} users and {} projects",
        users.len(),
        projects.len()
    );
    let user_repository = Arc::new(InMemoryUserRepository::new(users));
    let project_repository = Arc::new(InMemoryProjectRepository::new(projects));
    let message_repository = Arc::new(InMemoryMessageRepository::new());
    let registry = Arc::new(InMemoryRoomRegistry::new());

    // 2. MessagePusher and AI generator
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let generator: Arc<dyn AiGenerator> = match args.ai_api_key() {
        Some(api_key) => {
            tracing::info!("AI generation via {} ({})", args.ai_api_url, args.ai_model);
            Arc::new(HttpAiGenerator::new(
                args.ai_api_url.clone(),
                api_key.to_string(),
                args.ai_model.clone(),
                args.generation_timeout(),
            )?)
        }
        None => {
            tracing::warn!("AI_API_KEY is not set; AI requests will fail");
            Arc::new(UnavailableAiGenerator)
        }
    };

    // 3. UseCases
    let clock = Arc::new(SystemClock);
    let presence_lock = Arc::new(PresenceLock::new(()));
    let authenticate_session_usecase = Arc::new(AuthenticateSessionUseCase::new(
        verifier,
        user_repository,
        project_repository.clone(),
    ));
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        presence_lock.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        presence_lock,
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        registry.clone(),
        message_pusher,
        message_repository.clone(),
        generator,
        clock.clone(),
        args.generation_timeout(),
    ));
    let get_messages_usecase = Arc::new(GetMessagesUseCase::new(
        authenticate_session_usecase.clone(),
        message_repository,
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(
        authenticate_session_usecase.clone(),
        project_repository,
        registry,
    ));
    let session_recovery = Arc::new(SessionRecoveryStore::new(args.recovery_window(), clock));

    // 4. Create and run the server
    let server = Server::new(AppState {
        authenticate_session_usecase,
        connect_participant_usecase,
        disconnect_participant_usecase,
        send_message_usecase,
        get_messages_usecase,
        get_rooms_usecase,
        session_recovery,
        heartbeat: args.heartbeat(),
    });
    server.run(args.host, args.port).await
}
