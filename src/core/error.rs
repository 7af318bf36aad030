/// Gateway Error Types
///
/// Every failure raised while executing a recognized JSON-RPC method is a
/// `GatewayError`. The dispatcher turns each one into a `-32000` JSON-RPC
/// error whose message is the `Display` text below, so these strings are
/// part of the wire contract.

use thiserror::Error;

/// Errors raised while handling a `tools/call` (or any other recognized method).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The requested tool name is not in the registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required tool argument was absent or had the wrong JSON type.
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    /// The method parameters themselves were malformed.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// The upstream service could not be reached or its body could not be read.
    #[error("upstream request to {endpoint} failed: {source}")]
    UpstreamRequest {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream service answered with a non-2xx status.
    #[error("upstream {endpoint} returned HTTP {status}: {body}")]
    UpstreamStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The upstream body was not the JSON shape we expect.
    #[error("unexpected response from {endpoint}: {reason}")]
    UpstreamBody { endpoint: String, reason: String },
}

/// Errors raised while loading `GatewayConfig` from the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}
