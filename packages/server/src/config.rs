//! Command-line and environment configuration.
//!
//! Every flag falls back to an environment variable; `.env` files are loaded
//! by the binary before parsing.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::ui::HeartbeatConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "collab-server")]
#[command(about = "Project-scoped real-time collaboration server", long_about = None)]
pub struct ServerArgs {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Shared secret used to sign and verify credentials
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub jwt_secret: String,

    /// JSON fixture with users and projects
    #[arg(long, env = "SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// OpenAI-compatible chat-completions endpoint
    #[arg(
        long,
        env = "AI_API_URL",
        default_value = "https://api.openai.com/v1/chat/completions"
    )]
    pub ai_api_url: String,

    /// API key for the generation endpoint; generation is disabled without it
    #[arg(long, env = "AI_API_KEY", hide_env_values = true)]
    pub ai_api_key: Option<String>,

    #[arg(long, env = "AI_MODEL", default_value = "gpt-4o-mini")]
    pub ai_model: String,

    /// Upper bound on a single AI generation
    #[arg(long, env = "GENERATION_TIMEOUT_SECS", default_value = "60",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub generation_timeout_secs: u64,

    #[arg(long, env = "PING_INTERVAL_SECS", default_value = "25",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub ping_interval_secs: u64,

    /// Idle time after which a connection is dropped
    #[arg(long, env = "PING_TIMEOUT_SECS", default_value = "60",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub ping_timeout_secs: u64,

    /// How long a dropped connection can be resumed by session id (0 disables)
    #[arg(long, env = "RECOVERY_WINDOW_SECS", default_value = "120")]
    pub recovery_window_secs: u64,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "debug")]
    pub log_level: String,

    /// Print a 24h credential for this identity and exit
    #[arg(long, value_name = "EMAIL")]
    pub issue_token_for: Option<String>,
}

impl ServerArgs {
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn recovery_window(&self) -> Duration {
        Duration::from_secs(self.recovery_window_secs)
    }

    pub fn heartbeat(&self) -> HeartbeatConfig {
        HeartbeatConfig {
            ping_interval: Duration::from_secs(self.ping_interval_secs),
            ping_timeout: Duration::from_secs(self.ping_timeout_secs),
        }
    }

    /// The generation key, unless unset or blank
    pub fn ai_api_key(&self) -> Option<&str> {
        self.ai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
