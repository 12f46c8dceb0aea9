//! Logging setup for the collaboration server binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Sets up logging for the server library crate and for the binary itself.
/// `RUST_LOG` takes precedence over the default when it is set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "collab-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use collab_shared::logger::setup_logger;
///
/// setup_logger("collab-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directives used when `RUST_LOG` is not set.
///
/// Targets are module paths, so dashes in crate and binary names become underscores.
fn default_directives(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "collab_server={level},{bin}={level},tower_http={level}",
        level = default_log_level,
        bin = binary_name.replace('-', "_"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_normalizes_binary_name() {
        // テスト項目: バイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let binary_name = "collab-server";

        // when (操作):
        let directives = default_directives(binary_name, "info");

        // then (期待する結果):
        assert_eq!(
            directives,
            "collab_server=info,collab_server=info,tower_http=info"
        );
    }
}
