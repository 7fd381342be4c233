//! Startup helpers for the relay server.

use std::process::ExitCode;
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::llm::ChatBackend;
use crate::server::{self, AppState};

/// Run the relay until shutdown.
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting MHI relay v{}", env!("CARGO_PKG_VERSION"));

    let state = match initialize() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to initialize: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let result = rt.block_on(async {
        log_upstream_health(state.backend.as_ref()).await;
        server::run_server(state).await
    });

    if let Err(e) = result {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Read configuration and build application state without starting the server.
///
/// # Errors
/// Returns an error if the environment holds invalid values or state creation fails.
pub fn initialize() -> Result<Arc<AppState>, Box<dyn std::error::Error + Send + Sync>> {
    let config = RelayConfig::from_env()?;
    tracing::info!(
        port = config.port,
        model = %config.model,
        "Ollama endpoint: {}",
        config.ollama_url
    );

    AppState::from_config(config)
}

/// Probe the upstream once and log the outcome.
///
/// A missing model is logged at warn level but the server still starts.
pub async fn log_upstream_health(backend: &dyn ChatBackend) {
    let report = backend.health().await;
    if !report.reachable {
        tracing::warn!("{}", report.message);
    } else if !report.model_available {
        tracing::warn!(installed = ?report.models, "{}", report.message);
    } else {
        tracing::info!("{}", report.message);
    }
}
