//! net.network_tool — Routes an action string to ping or dns
//!
//! Unsupported actions are a caller error and come back as
//! `Err(ToolError::InvalidArgument)`. Everything that goes wrong on the
//! network side is returned as data in the `ToolOutput`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

use super::dns::{self, ResolveResult};
use super::ping::{ProbeRequest, ProbeResult, Prober, DEFAULT_COUNT};
use crate::error::ToolError;
use crate::executor::{HandlerOutput, ToolHandler};

pub const UNSUPPORTED_ACTION: &str = "Unsupported network action. Use 'ping' or 'dns'.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkAction {
    Ping,
    Dns,
}

impl FromStr for NetworkAction {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ping" => Ok(NetworkAction::Ping),
            "dns" => Ok(NetworkAction::Dns),
            _ => Err(ToolError::InvalidArgument(UNSUPPORTED_ACTION.to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchRequest {
    pub action: String,
    pub target: String,
    #[serde(default = "default_count")]
    pub count: i64,
}

fn default_count() -> i64 {
    i64::from(DEFAULT_COUNT)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Probe(ProbeResult),
    Resolve(ResolveResult),
}

impl ToolOutput {
    pub fn succeeded(&self) -> bool {
        match self {
            ToolOutput::Probe(result) => result.ok,
            ToolOutput::Resolve(result) => result.ips().is_some(),
        }
    }
}

/// The network diagnostics tool exposed to the host
pub struct NetworkTool {
    prober: Prober,
}

impl NetworkTool {
    pub fn new(prober: Prober) -> Self {
        Self { prober }
    }

    /// `dns` ignores `count`. `ping` uses the prober's default timeout.
    /// The action is checked before any other argument.
    pub async fn dispatch(
        &self,
        action: &str,
        target: &str,
        count: i64,
    ) -> Result<ToolOutput, ToolError> {
        let action: NetworkAction = action.parse()?;

        match action {
            NetworkAction::Ping => {
                let count = u32::try_from(count)
                    .ok()
                    .filter(|c| *c >= 1)
                    .ok_or_else(|| {
                        ToolError::InvalidArgument("Ping count must be at least 1".to_string())
                    })?;
                let request =
                    ProbeRequest::new(target, count, self.prober.default_timeout_secs());
                request.validate()?;
                info!("network_tool: ping {target} x{count}");
                Ok(ToolOutput::Probe(self.prober.probe(&request).await))
            }
            NetworkAction::Dns => {
                info!("network_tool: dns {target}");
                Ok(ToolOutput::Resolve(dns::resolve(target).await))
            }
        }
    }
}

impl Default for NetworkTool {
    fn default() -> Self {
        Self::new(Prober::default())
    }
}

#[async_trait]
impl ToolHandler for NetworkTool {
    async fn handle(&self, input: serde_json::Value) -> Result<HandlerOutput, ToolError> {
        let req: DispatchRequest =
            serde_json::from_value(input).map_err(|e| ToolError::InvalidInput(e.to_string()))?;

        let output = self.dispatch(&req.action, &req.target, req.count).await?;

        Ok(HandlerOutput {
            success: output.succeeded(),
            output: serde_json::to_value(&output)?,
        })
    }
}
