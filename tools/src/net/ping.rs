//! net.ping — Reachability probe through the system ping utility
//!
//! The probe shells out to `ping` with stdout and stderr on one pipe, and
//! hands the raw text back. Nothing is parsed. The whole invocation is bounded by an
//! overall wait budget of `timeout_secs * count + margin`; when it runs out
//! the child is killed and reaped and the output is the literal `"timeout"`.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::ToolError;

pub const DEFAULT_COUNT: u32 = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;
/// Fixed slack added on top of the per-attempt timeouts
pub const BUDGET_MARGIN_SECS: u64 = 5;
/// Output reported when the overall wait budget is exceeded
pub const TIMEOUT_MARKER: &str = "timeout";

/// Platform family of the ping utility, which decides its flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingFlavor {
    /// iputils / BSD ping: `-c <count> -W <seconds>`
    Posix,
    /// ping.exe: `-n <count> -w <milliseconds>`
    Windows,
}

impl PingFlavor {
    /// Flavor of the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            PingFlavor::Windows
        } else {
            PingFlavor::Posix
        }
    }

    pub fn count_flag(self) -> &'static str {
        match self {
            PingFlavor::Posix => "-c",
            PingFlavor::Windows => "-n",
        }
    }

    /// Per-attempt timeout flag and its value in the unit the utility expects
    pub fn timeout_args(self, timeout_secs: u64) -> [String; 2] {
        match self {
            PingFlavor::Posix => ["-W".to_string(), timeout_secs.to_string()],
            PingFlavor::Windows => [
                "-w".to_string(),
                timeout_secs.saturating_mul(1000).to_string(),
            ],
        }
    }

    /// Full argument vector: `[count-flag, count, timeout-flag, timeout, target]`
    pub fn build_args(self, target: &str, count: u32, timeout_secs: u64) -> Vec<String> {
        let [timeout_flag, timeout_value] = self.timeout_args(timeout_secs);
        vec![
            self.count_flag().to_string(),
            count.to_string(),
            timeout_flag,
            timeout_value,
            target.to_string(),
        ]
    }
}

/// A single reachability check
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProbeRequest {
    pub target: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_count() -> u32 {
    DEFAULT_COUNT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ProbeRequest {
    pub fn new(target: impl Into<String>, count: u32, timeout_secs: u64) -> Self {
        Self {
            target: target.into(),
            count,
            timeout_secs,
        }
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        if self.target.trim().is_empty() {
            return Err(ToolError::InvalidArgument(
                "Target must not be empty".to_string(),
            ));
        }
        if self.count == 0 {
            return Err(ToolError::InvalidArgument(
                "Ping count must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ToolError::InvalidArgument(
                "Ping timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Overall wall-clock budget for the whole invocation
    pub fn wait_budget(&self, margin: Duration) -> Duration {
        Duration::from_secs(self.timeout_secs.saturating_mul(u64::from(self.count)))
            .saturating_add(margin)
    }
}

/// Outcome of a probe. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub ok: bool,
    pub output: String,
}

impl ProbeResult {
    pub fn timed_out() -> Self {
        Self {
            ok: false,
            output: TIMEOUT_MARKER.to_string(),
        }
    }

    fn failed(output: String) -> Self {
        Self { ok: false, output }
    }
}

/// Runs the ping utility with a bounded wait budget
#[derive(Debug, Clone)]
pub struct Prober {
    program: String,
    prefix_args: Vec<String>,
    flavor: PingFlavor,
    margin: Duration,
    default_timeout_secs: u64,
}

impl Default for Prober {
    fn default() -> Self {
        Self {
            program: "ping".to_string(),
            prefix_args: Vec::new(),
            flavor: PingFlavor::current(),
            margin: Duration::from_secs(BUDGET_MARGIN_SECS),
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Prober {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run ping through another program, e.g. `sudo -n ping`.
    /// `prefix_args` go before the ping arguments.
    pub fn with_command(mut self, program: impl Into<String>, prefix_args: Vec<String>) -> Self {
        self.program = program.into();
        self.prefix_args = prefix_args;
        self
    }

    pub fn with_flavor(mut self, flavor: PingFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_default_timeout(mut self, timeout_secs: u64) -> Self {
        self.default_timeout_secs = timeout_secs.max(1);
        self
    }

    pub fn default_timeout_secs(&self) -> u64 {
        self.default_timeout_secs
    }

    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// Probe `target` `count` times using the configured default timeout
    pub async fn ping(&self, target: &str, count: u32) -> ProbeResult {
        self.probe(&ProbeRequest::new(target, count, self.default_timeout_secs))
            .await
    }

    pub async fn probe(&self, request: &ProbeRequest) -> ProbeResult {
        let mut args = self.prefix_args.clone();
        args.extend(
            self.flavor
                .build_args(&request.target, request.count, request.timeout_secs),
        );
        let budget = request.wait_budget(self.margin);

        debug!(program = %self.program, ?args, ?budget, "Spawning ping");

        // One pipe shared by stdout and stderr keeps the lines in the order ping wrote them
        let (mut reader, writer) = match std::io::pipe() {
            Ok(pipe) => pipe,
            Err(e) => return ProbeResult::failed(format!("Failed to create output pipe: {e}")),
        };
        let writer_err = match writer.try_clone() {
            Ok(w) => w,
            Err(e) => return ProbeResult::failed(format!("Failed to create output pipe: {e}")),
        };

        // The Command holding the parent's write ends is dropped at the end of
        // this statement, so the reader sees EOF once the child exits
        let mut child = match Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(writer_err)
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to execute {}: {e}", self.program);
                return ProbeResult::failed(format!("Failed to execute {}: {e}", self.program));
            }
        };

        let start = Instant::now();
        let collect = tokio::task::spawn_blocking(move || {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).map(|_| buf)
        });

        let run = async {
            let status = child.wait().await?;
            let out = collect.await.map_err(std::io::Error::other)??;
            Ok::<_, std::io::Error>((status, String::from_utf8_lossy(&out).into_owned()))
        };

        let outcome = tokio::time::timeout(budget, run).await;

        match outcome {
            Ok(Ok((status, output))) => {
                debug!(
                    host = %request.target,
                    ?status,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Ping finished"
                );
                ProbeResult {
                    ok: status.success(),
                    output,
                }
            }
            Ok(Err(e)) => {
                warn!("Failed to wait for ping: {e}");
                ProbeResult::failed(format!("Failed to wait for ping: {e}"))
            }
            Err(_) => {
                warn!(
                    host = %request.target,
                    "Ping exceeded its wait budget of {:?}, killing it", budget
                );
                terminate(&mut child).await;
                ProbeResult::timed_out()
            }
        }
    }
}

/// Kill the child and reap it so no zombie is left behind
async fn terminate(child: &mut Child) {
    if let Err(e) = child.kill().await {
        warn!("Failed to kill ping process: {e}");
    }
}
