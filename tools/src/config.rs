//! netdiag configuration loading and parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::net::ping::{Prober, BUDGET_MARGIN_SECS, DEFAULT_TIMEOUT_SECS};

const DEFAULT_CONFIG_PATH: &str = "/etc/netdiag/config.toml";

/// Root configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct NetdiagConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ping: PingConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `netdiag_tools=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PingConfig {
    #[serde(default = "default_ping_binary")]
    pub binary: String,
    /// Arguments placed before the ping arguments (for wrappers like `sudo -n ping`)
    #[serde(default)]
    pub prefix_args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_margin_secs")]
    pub margin_secs: u64,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            binary: default_ping_binary(),
            prefix_args: Vec::new(),
            timeout_secs: default_timeout_secs(),
            margin_secs: default_margin_secs(),
        }
    }
}

impl PingConfig {
    pub fn prober(&self) -> Prober {
        Prober::new()
            .with_command(self.binary.clone(), self.prefix_args.clone())
            .with_default_timeout(self.timeout_secs)
            .with_margin(Duration::from_secs(self.margin_secs))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_ping_binary() -> String {
    "ping".to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_margin_secs() -> u64 {
    BUDGET_MARGIN_SECS
}

/// Load configuration from `NETDIAG_CONFIG` or the default path, falling
/// back to defaults when the file does not exist.
pub fn load_config() -> Result<NetdiagConfig> {
    let config_path =
        std::env::var("NETDIAG_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config_from(Path::new(&config_path))
}

pub fn load_config_from(path: &Path) -> Result<NetdiagConfig> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: NetdiagConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    } else {
        tracing::warn!("Config file not found at {}, using defaults", path.display());
        Ok(NetdiagConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = NetdiagConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(config.ping.binary, "ping");
        assert_eq!(config.ping.timeout_secs, 2);
        assert_eq!(config.ping.margin_secs, 5);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[ping]
timeout_secs = 4
"#;
        let config: NetdiagConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ping.timeout_secs, 4);
        assert_eq!(config.ping.margin_secs, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[logging]
level = "netdiag_tools=debug"
json = true

[ping]
binary = "sudo"
prefix_args = ["-n", "ping"]
timeout_secs = 1
margin_secs = 3
"#;
        let config: NetdiagConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "netdiag_tools=debug");
        assert!(config.logging.json);
        assert_eq!(config.ping.prefix_args, vec!["-n", "ping"]);

        let prober = config.ping.prober();
        assert_eq!(prober.default_timeout_secs(), 1);
        assert_eq!(prober.margin(), Duration::from_secs(3));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.ping.binary, "ping");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"warn\"").unwrap();
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ping\ntimeout_secs = ").unwrap();
        assert!(load_config_from(file.path()).is_err());
    }
}
