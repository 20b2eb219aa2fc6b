//! netdiag tool host — serves `net.network_tool` over stdin/stdout
//!
//! Reads newline-delimited JSON requests from stdin and writes one JSON
//! reply per line to stdout. Logs go to stderr.

use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use netdiag_tools::config::{self, LoggingConfig};
use netdiag_tools::executor::Executor;
use netdiag_tools::registry::Registry;

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load_config()?;
    init_tracing(&config.logging);

    info!("netdiag tool host starting...");

    let mut reg = Registry::new();
    let mut executor = Executor::new();
    netdiag_tools::register_builtin_tools(&mut reg, &mut executor, config.ping.prober());

    netdiag_tools::host::serve(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &mut reg,
        &executor,
    )
    .await?;

    info!("stdin closed, shutting down");
    Ok(())
}
