//! Configuration schema definitions.
//!
//! Every field has a default matching the original deployment, so an empty
//! (or absent) config file yields a proxy mounted at `/api/proxy` in front of
//! `https://api.neople.co.kr/df`.

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, mount prefix).
    pub listener: ListenerConfig,

    /// Upstream API settings.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Number of leading path segments stripped before forwarding.
    /// `2` matches a handler exposed under `/api/proxy`.
    pub mount_depth: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            mount_depth: 2,
        }
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL the upstream path suffix is appended to.
    pub base_url: String,

    /// Query parameter carrying the API key. Client-supplied values are dropped.
    pub key_param: String,

    /// Honor HTTP(S)_PROXY from the environment for upstream calls.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.neople.co.kr/df".to_string(),
            key_param: "apikey".to_string(),
            system_proxy: true,
        }
    }
}

/// Timeout configuration. Request and upstream timeouts are off unless set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds (answered with 408).
    pub request_secs: Option<u64>,

    /// Upstream call timeout in seconds (answered with the generic 500).
    pub upstream_secs: Option<u64>,

    /// How long shutdown waits for in-flight requests before dropping them.
    pub shutdown_drain_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: None,
            upstream_secs: None,
            shutdown_drain_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
