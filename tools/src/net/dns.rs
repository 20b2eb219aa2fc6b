//! net.dns — DNS lookup through the platform resolver

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::IpAddr;
use tracing::{debug, warn};

/// Either the resolved addresses or the resolver's error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolveResult {
    Resolved { ips: Vec<String> },
    Failed { error: String },
}

impl ResolveResult {
    /// Deduplicate and sort by string comparison, so `10.0.0.10` sorts before `10.0.0.2`
    pub fn from_addrs<I>(addrs: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        let unique: BTreeSet<String> = addrs.into_iter().map(|ip| ip.to_string()).collect();
        ResolveResult::Resolved {
            ips: unique.into_iter().collect(),
        }
    }

    pub fn ips(&self) -> Option<&[String]> {
        match self {
            ResolveResult::Resolved { ips } => Some(ips),
            ResolveResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResolveResult::Resolved { .. } => None,
            ResolveResult::Failed { error } => Some(error),
        }
    }
}

/// Resolve `host` to every address the platform resolver returns, IPv4 and IPv6.
/// Never fails; resolver errors come back as `ResolveResult::Failed`.
pub async fn resolve(host: &str) -> ResolveResult {
    // getaddrinfo needs a service, port 0 leaves it unconstrained
    match tokio::net::lookup_host((host, 0u16)).await {
        Ok(addrs) => {
            let result = ResolveResult::from_addrs(addrs.map(|addr| addr.ip()));
            debug!(
                host,
                count = result.ips().map_or(0, |ips| ips.len()),
                "Resolved host"
            );
            result
        }
        Err(e) => {
            warn!("DNS resolution failed for {host}: {e}");
            ResolveResult::Failed {
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_from_addrs_sorts_lexically() {
        let result = ResolveResult::from_addrs([ip("10.0.0.2"), ip("10.0.0.10")]);
        assert_eq!(
            result.ips().unwrap(),
            &["10.0.0.10".to_string(), "10.0.0.2".to_string()]
        );
    }

    #[test]
    fn test_from_addrs_deduplicates() {
        // getaddrinfo returns one entry per socket type
        let result = ResolveResult::from_addrs([
            ip("127.0.0.1"),
            ip("127.0.0.1"),
            ip("::1"),
            ip("127.0.0.1"),
            ip("::1"),
        ]);
        assert_eq!(
            result.ips().unwrap(),
            &["127.0.0.1".to_string(), "::1".to_string()]
        );
    }

    #[test]
    fn test_from_addrs_mixed_families_use_string_order() {
        let result = ResolveResult::from_addrs([
            ip("2001:db8::1"),
            ip("93.184.216.34"),
            ip("192.0.2.7"),
        ]);
        assert_eq!(
            result.ips().unwrap(),
            &[
                "192.0.2.7".to_string(),
                "2001:db8::1".to_string(),
                "93.184.216.34".to_string(),
            ]
        );
    }

    #[test]
    fn test_result_json_shapes() {
        let ok = ResolveResult::Resolved {
            ips: vec!["127.0.0.1".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"ips": ["127.0.0.1"]})
        );

        let failed = ResolveResult::Failed {
            error: "no such host".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({"error": "no such host"})
        );
        assert_eq!(failed.error(), Some("no such host"));
        assert!(failed.ips().is_none());
    }

    #[tokio::test]
    async fn test_resolve_localhost() {
        let result = resolve("localhost").await;
        let ips = result.ips().expect("localhost should resolve");
        assert!(ips.iter().any(|ip| ip == "127.0.0.1" || ip == "::1"));
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let result = resolve("::1").await;
        assert_eq!(result.ips().unwrap(), &["::1".to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_unknown_host_returns_error() {
        let result = resolve("does-not-exist.invalid").await;
        let error = result.error().expect("resolution should fail");
        assert!(!error.is_empty());
    }
}
