/// Tool and Server Registries
///
/// Both catalogs are built once at startup and never mutated afterwards. They
/// are shared by `Arc` between the HTTP workers, the dispatcher and the tool
/// executor.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;

use crate::core::config::GatewayConfig;
use crate::tools::{self, ToolKind};

/// MCP tool definition, serialized exactly as it appears in `tools/list`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Ordered catalog of the tools this gateway can execute.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// Build the registry with every built-in tool, in registration order.
    pub fn builtin() -> Self {
        Self {
            tools: ToolKind::ALL.iter().map(|kind| tools::definition(*kind)).collect(),
        }
    }

    /// Every definition, in the order `tools/list` reports them.
    pub fn list_tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|tool| tool.name.as_str())
    }

    /// View of the catalog that serializes as `{name: definition}`.
    pub fn by_name(&self) -> ByName<'_, ToolDefinition> {
        ByName(&self.tools)
    }
}

/// An upstream service the gateway knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDefinition {
    /// Unique identifier, used as the key in `GET /servers`
    pub name: String,
    /// Base URL the gateway reaches the service at
    pub url: String,
    /// Human-readable summary of what the service provides
    pub description: String,
}

/// Ordered catalog of upstream services, reported by `GET /` and `GET /servers`.
#[derive(Debug, Clone)]
pub struct ServerRegistry {
    servers: Vec<ServerDefinition>,
}

impl ServerRegistry {
    /// Register the Ollama and n8n upstreams, in that order.
    ///
    /// # Arguments
    /// * `config` - Startup configuration supplying each service's base URL
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            servers: vec![
                ServerDefinition {
                    name: "ollama".to_string(),
                    url: config.ollama_url.clone(),
                    description: "Local LLM via Ollama".to_string(),
                },
                ServerDefinition {
                    name: "n8n".to_string(),
                    url: config.n8n_url.clone(),
                    description: "Workflow automation".to_string(),
                },
            ],
        }
    }

    /// Service names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.servers.iter().map(|server| server.name.as_str())
    }

    /// View of the catalog that serializes as `{name: {url, description}}`.
    pub fn by_name(&self) -> ByName<'_, ServerDefinition> {
        ByName(&self.servers)
    }
}

/// Serializes a registry as a JSON object keyed by entry name, preserving
/// registration order.
pub struct ByName<'a, T>(&'a [T]);

impl Serialize for ByName<'_, ToolDefinition> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|tool| (tool.name.as_str(), tool)))
    }
}

impl Serialize for ByName<'_, ServerDefinition> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for server in self.0 {
            map.serialize_entry(
                server.name.as_str(),
                &serde_json::json!({
                    "url": server.url,
                    "description": server.description,
                }),
            )?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> GatewayConfig {
        GatewayConfig::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn builtin_tools_are_listed_in_registration_order() {
        let registry = ToolRegistry::builtin();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["chat", "list_models", "trigger_workflow"]);
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let registry = ToolRegistry::builtin();
        assert!(registry.get("chat").is_some());
        assert!(registry.get("Chat").is_none());
        assert!(registry.get("cha").is_none());
    }

    #[test]
    fn tool_definition_uses_camel_case_schema_key() {
        let registry = ToolRegistry::builtin();
        let value = serde_json::to_value(registry.get("chat").unwrap()).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("input_schema").is_none());
        assert_eq!(value["inputSchema"]["required"], json!(["message"]));
        assert_eq!(
            value["inputSchema"]["properties"]["model"]["default"],
            json!("mistral:7b")
        );
    }

    #[test]
    fn tools_by_name_is_keyed_by_tool_name() {
        let registry = ToolRegistry::builtin();
        let value = serde_json::to_value(registry.by_name()).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["list_models"]["name"], json!("list_models"));
        assert_eq!(
            map["trigger_workflow"]["inputSchema"]["required"],
            json!(["workflow_id"])
        );
    }

    #[test]
    fn servers_come_from_config() {
        let registry = ServerRegistry::from_config(&config());
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["ollama", "n8n"]);

        let value = serde_json::to_value(registry.by_name()).unwrap();
        assert_eq!(
            value,
            json!({
                "ollama": {"url": "http://ollama:11434", "description": "Local LLM via Ollama"},
                "n8n": {"url": "http://n8n:5678", "description": "Workflow automation"},
            })
        );
    }
}
