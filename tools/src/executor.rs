//! Tool execution pipeline
//!
//! Pipeline: look up definition → validate input against schema → run handler
//! (bounded by the definition's `timeout_ms`) → report

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ToolError;
use crate::registry::Registry;
use crate::schema;

/// What a handler produced. `success` is false for operational failures,
/// which still carry their details in `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOutput {
    pub success: bool,
    pub output: serde_json::Value,
}

/// A callable tool implementation
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, input: serde_json::Value) -> Result<HandlerOutput, ToolError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
    pub tool_name: String,
    #[serde(default)]
    pub input: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteResponse {
    pub success: bool,
    pub output: serde_json::Value,
    pub execution_id: String,
    pub duration_ms: u64,
}

/// Executes tools through the pipeline
#[derive(Default)]
pub struct Executor {
    /// Map of tool name → handler
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl Executor {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register_handler(&mut self, name: &str, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(name.to_string(), handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Execute a tool. Caller errors (unknown tool, bad input, invalid
    /// arguments) propagate as `Err`; operational failures come back as
    /// an `ExecuteResponse` with `success: false`.
    pub async fn execute(
        &self,
        registry: &Registry,
        request: ExecuteRequest,
    ) -> Result<ExecuteResponse, ToolError> {
        let execution_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        // 1. Validate: check tool exists and has a handler
        let tool_def = registry
            .get_tool(&request.tool_name)
            .ok_or_else(|| ToolError::UnknownTool(request.tool_name.clone()))?;
        let handler = self
            .handlers
            .get(&request.tool_name)
            .ok_or_else(|| ToolError::UnknownTool(request.tool_name.clone()))?;

        // 2. Schema check
        let input = schema::normalize_input(request.input);
        if let Err(e) = schema::validate_input(&input, &tool_def.input_schema) {
            warn!("Rejected input for {}: {e}", request.tool_name);
            return Err(e);
        }

        info!("Executing: tool={} id={}", request.tool_name, execution_id);

        // 3. Run
        let result = if tool_def.timeout_ms > 0 {
            let limit = Duration::from_millis(tool_def.timeout_ms);
            match tokio::time::timeout(limit, handler.handle(input)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        "Timed out: tool={} id={} after {}ms",
                        request.tool_name, execution_id, tool_def.timeout_ms
                    );
                    return Ok(ExecuteResponse {
                        success: false,
                        output: serde_json::json!({
                            "error": format!("Tool timed out after {}ms", tool_def.timeout_ms)
                        }),
                        execution_id,
                        duration_ms: start.elapsed().as_millis() as u64,
                    });
                }
            }
        } else {
            handler.handle(input).await
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(out) => {
                info!(
                    "Finished: tool={} id={} success={} duration_ms={}",
                    request.tool_name, execution_id, out.success, duration_ms
                );
                Ok(ExecuteResponse {
                    success: out.success,
                    output: out.output,
                    execution_id,
                    duration_ms,
                })
            }
            Err(e) => {
                warn!(
                    "Failed: tool={} id={} error={}",
                    request.tool_name, execution_id, e
                );
                Err(e)
            }
        }
    }
}
