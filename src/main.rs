/// MCP Gateway Entry Point
///
/// Loads configuration from the environment, builds the tool and server
/// registries, and serves JSON-RPC over the selected transport.
///
/// Environment Variables:
/// - OLLAMA_URL: Ollama base URL (default: "http://ollama:11434")
/// - N8N_URL: n8n base URL (default: "http://n8n:5678")
/// - UPSTREAM_TIMEOUT_SECS: timeout for upstream calls (default: none)
/// - MCP_TRANSPORT_MODE: "http", "stdio", or "both" (default: "http")
/// - WORKER_THREADS: HTTP worker count (default: CPU count, max 16)
/// - MAX_BODY_BYTES: largest accepted HTTP request body (default: unlimited)
/// - RUST_LOG: log filter (default: "mcp_gateway=info,actix_web=info")

mod core;
mod tools;
mod upstream;

use tracing_subscriber::EnvFilter;

use crate::core::config::{GatewayConfig, TransportMode};
use crate::core::server::{self, AppState};
use crate::core::stdio;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Logs go to stderr so they never mix with STDIO protocol output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mcp_gateway=info,actix_web=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize upstream clients");
            std::process::exit(1);
        }
    };

    match config.transport {
        TransportMode::Http => server::run_server_http(&config, state).await,
        TransportMode::Stdio => stdio::run_server_stdio(state.dispatcher).await,
        TransportMode::Both => {
            let dispatcher = state.dispatcher.clone();
            let stdio_handle = tokio::spawn(async move {
                if let Err(e) = stdio::run_server_stdio(dispatcher).await {
                    tracing::error!(error = %e, "stdio transport failed");
                }
            });

            let http_result = server::run_server_http(&config, state).await;

            // HTTP shutdown ends the process; stop reading stdin too.
            stdio_handle.abort();
            http_result
        }
    }
}
