/// Upstream Service Clients
///
/// Tools never talk HTTP directly; they go through the `LlmBackend` trait so
/// the executor can be driven by a fake backend in tests.

pub mod ollama;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::error::GatewayError;

/// Operations the gateway needs from an LLM runtime.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Run a single non-streaming generation and return the generated text.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GatewayError>;

    /// Return the runtime's list of installed models as raw JSON.
    async fn list_models(&self) -> Result<Value, GatewayError>;
}
