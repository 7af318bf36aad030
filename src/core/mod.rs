/// Core Gateway Module
///
/// - config.rs: environment-driven startup configuration
/// - error.rs: gateway and configuration error types
/// - protocol.rs: JSON-RPC 2.0 envelopes and protocol constants
/// - registry.rs: read-only tool and upstream server catalogs
/// - dispatcher.rs: method routing and error normalization
/// - server.rs: HTTP transport (Actix Web)
/// - stdio.rs: line-delimited STDIO transport

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod stdio;
