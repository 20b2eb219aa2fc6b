//! Error types for tool execution
//!
//! Operational failures (non-zero ping exit, probe timeout, DNS failure)
//! are returned as result data by the tools themselves. Only contract
//! violations reach this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    /// The caller passed an argument the tool does not accept
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Input did not match the tool's JSON schema or could not be decoded
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Short machine-readable name used on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::InvalidArgument(_) => "invalid_argument",
            ToolError::UnknownTool(_) => "unknown_tool",
            ToolError::InvalidInput(_) => "invalid_input",
            ToolError::Serialization(_) => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_displays_bare_message() {
        let err = ToolError::InvalidArgument("bad action".to_string());
        assert_eq!(err.to_string(), "bad action");
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[test]
    fn test_unknown_tool_message() {
        let err = ToolError::UnknownTool("net.traceroute".to_string());
        assert_eq!(err.to_string(), "Unknown tool: net.traceroute");
        assert_eq!(err.kind(), "unknown_tool");
    }
}
