/// Gateway Configuration
///
/// All settings are read once at startup from environment variables. Loading
/// goes through a lookup closure so tests can supply values without mutating
/// the process environment.

use std::time::Duration;

use crate::core::error::ConfigError;

pub const DEFAULT_OLLAMA_URL: &str = "http://ollama:11434";
pub const DEFAULT_N8N_URL: &str = "http://n8n:5678";

/// The HTTP listener always binds this port.
pub const HTTP_PORT: u16 = 8080;
pub const HTTP_HOST: &str = "0.0.0.0";

/// Which transports the gateway serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Http,
    Stdio,
    Both,
}

impl TransportMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "http" => Ok(Self::Http),
            "stdio" => Ok(Self::Stdio),
            "both" => Ok(Self::Both),
            _ => Err(ConfigError::InvalidValue {
                key: "MCP_TRANSPORT_MODE",
                value: value.to_string(),
                reason: "must be 'http', 'stdio', or 'both'",
            }),
        }
    }
}

/// Startup configuration for the gateway process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the Ollama LLM runtime, without trailing slash.
    pub ollama_url: String,
    /// Base URL of the n8n workflow engine, without trailing slash.
    pub n8n_url: String,
    /// Optional total timeout for upstream calls. `None` waits indefinitely.
    pub upstream_timeout: Option<Duration>,
    pub transport: TransportMode,
    /// Explicit HTTP worker count; `None` means derive from CPU count.
    pub workers: Option<usize>,
    /// Cap on an HTTP request body in bytes. `None` accepts bodies of any size.
    pub max_body_bytes: Option<usize>,
}

impl GatewayConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| default.to_string())
        };

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_positive(
                "UPSTREAM_TIMEOUT_SECS",
                &raw,
            )?)),
            None => None,
        };

        let transport = match lookup("MCP_TRANSPORT_MODE") {
            Some(raw) => TransportMode::parse(raw.trim())?,
            None => TransportMode::Http,
        };

        let workers = match lookup("WORKER_THREADS") {
            Some(raw) => Some(parse_positive("WORKER_THREADS", &raw)? as usize),
            None => None,
        };

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(raw) => Some(parse_positive("MAX_BODY_BYTES", &raw)? as usize),
            None => None,
        };

        Ok(Self {
            ollama_url: url("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            n8n_url: url("N8N_URL", DEFAULT_N8N_URL),
            upstream_timeout,
            transport,
            workers,
            max_body_bytes,
        })
    }

    /// Worker threads for the HTTP server: explicit value, else CPU count capped at 16.
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| num_cpus::get().clamp(1, 16))
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "expected a positive integer",
        }),
    }
}
