//! Newline-delimited JSON host loop
//!
//! Each input line is `{"tool_name": ..., "input": {...}}`,
//! `{"list": "<namespace>"}` or `{"deregister": "<tool name>"}`. Every
//! line gets exactly one JSON line back. Requests are handled one at a
//! time, each to completion.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::executor::{ExecuteRequest, Executor};
use crate::registry::Registry;

#[derive(Deserialize)]
#[serde(untagged)]
enum HostRequest {
    List { list: String },
    Deregister { deregister: String },
    Execute(ExecuteRequest),
}

/// Handle one request line and build its reply
pub async fn handle_line(
    line: &str,
    registry: &mut Registry,
    executor: &Executor,
) -> serde_json::Value {
    let request: HostRequest = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => {
            warn!("Malformed request line: {e}");
            return json!({"error": format!("Malformed request: {e}"), "kind": "invalid_input"});
        }
    };

    match request {
        HostRequest::List { list } => json!({ "tools": registry.list_tools(&list) }),
        HostRequest::Deregister { deregister } => match registry.deregister_tool(&deregister) {
            Some(tool) => {
                info!("Deregistered tool: {}", tool.name);
                json!({ "deregistered": tool.name })
            }
            None => json!({
                "error": format!("Unknown tool: {deregister}"),
                "kind": "unknown_tool"
            }),
        },
        HostRequest::Execute(req) => match executor.execute(registry, req).await {
            Ok(resp) => serde_json::to_value(&resp)
                .unwrap_or_else(|e| json!({"error": e.to_string(), "kind": "serialization"})),
            Err(e) => json!({"error": e.to_string(), "kind": e.kind()}),
        },
    }
}

/// Serve requests from `reader` until EOF
pub async fn serve<R, W>(
    reader: R,
    mut writer: W,
    registry: &mut Registry,
    executor: &Executor,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read request")? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Request: {line}");

        let reply = handle_line(&line, registry, executor).await;
        let mut bytes = serde_json::to_vec(&reply).context("Failed to serialize reply")?;
        bytes.push(b'\n');
        writer
            .write_all(&bytes)
            .await
            .context("Failed to write reply")?;
        writer.flush().await.context("Failed to flush reply")?;
    }

    Ok(())
}
