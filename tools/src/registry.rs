//! Tool Registry — stores and retrieves tool definitions

use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Describes a tool to the host that calls it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub namespace: String,
    pub version: String,
    pub description: String,
    /// JSON Schema for the input; `null` means no validation
    pub input_schema: serde_json::Value,
    pub risk_level: String,
    pub requires_confirmation: bool,
    pub idempotent: bool,
    /// Upper bound the executor puts on one call; 0 disables it
    pub timeout_ms: u64,
}

/// In-memory tool registry
#[derive(Default)]
pub struct Registry {
    tools: HashMap<String, ToolDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool definition
    pub fn register_tool(&mut self, tool: ToolDefinition) {
        info!("Registered tool: {} (ns: {})", tool.name, tool.namespace);
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// List tools sorted by name, optionally filtered by namespace
    pub fn list_tools(&self, namespace: &str) -> Vec<ToolDefinition> {
        let mut tools: Vec<ToolDefinition> = self
            .tools
            .values()
            .filter(|t| namespace.is_empty() || t.namespace == namespace)
            .cloned()
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Deregister a tool
    pub fn deregister_tool(&mut self, name: &str) -> Option<ToolDefinition> {
        self.tools.remove(name)
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

/// Helper to create a ToolDefinition
pub fn make_tool(
    name: &str,
    namespace: &str,
    description: &str,
    risk_level: &str,
    idempotent: bool,
    timeout_ms: u64,
) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        namespace: namespace.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: description.to_string(),
        input_schema: serde_json::Value::Null,
        risk_level: risk_level.to_string(),
        requires_confirmation: risk_level == "critical",
        idempotent,
        timeout_ms,
    }
}
