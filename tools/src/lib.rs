//! netdiag tools — network diagnostics (ping and DNS lookup) exposed as a
//! single callable tool for tool-calling hosts.
//!
//! The host registers `net.network_tool` once at startup and sends it
//! `{action, target, count}` requests. See [`net::NetworkTool::dispatch`].

pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod net;
pub mod registry;
pub mod schema;

pub use error::ToolError;

use tracing::info;

/// Register all built-in tools
pub fn register_builtin_tools(
    reg: &mut registry::Registry,
    executor: &mut executor::Executor,
    prober: net::ping::Prober,
) {
    // Network tools
    net::register_tools(reg, executor, net::NetworkTool::new(prober));

    info!("Registered {} built-in tools", reg.tool_count());
}
