//! Network tools — ping and dns behind a single `net.network_tool` action.

pub mod dispatch;
pub mod dns;
pub mod ping;

use serde_json::json;
use std::sync::Arc;

use crate::executor::Executor;
use crate::registry::{make_tool, Registry};

pub use dispatch::{NetworkTool, ToolOutput, UNSUPPORTED_ACTION};

pub const NETWORK_TOOL: &str = "net.network_tool";

/// JSON Schema for `net.network_tool` input. Types only: value checks
/// belong to the dispatcher, which looks at `action` before anything else.
pub fn network_tool_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "action": { "type": "string" },
            "target": { "type": "string" },
            "count": { "type": "integer" }
        },
        "required": ["action", "target"]
    })
}

/// Register the network tool definition and its handler.
pub fn register_tools(reg: &mut Registry, executor: &mut Executor, tool: NetworkTool) {
    let mut def = make_tool(
        NETWORK_TOOL,
        "net",
        "Network helper supporting 'ping' and 'dns': ping a host and return raw output, \
         or resolve a hostname to its addresses",
        "low",
        true,
        120000,
    );
    def.input_schema = network_tool_schema();

    reg.register_tool(def);
    executor.register_handler(NETWORK_TOOL, Arc::new(tool));
}
