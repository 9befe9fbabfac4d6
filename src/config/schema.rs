//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the failover
//! client. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a failover manager.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailoverSettings {
    /// The default, highest-priority region.
    pub primary: RegionConfig,

    /// Backup regions, in the order they are tried.
    pub backups: Vec<RegionConfig>,

    /// Retry, sweep and recovery settings.
    pub failover: FailoverConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Connection settings for one region of the messaging backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Region identifier for logging/metrics.
    pub name: String,

    /// Base URL of the region (e.g., "https://ps.pndsn.com").
    pub origin: String,

    /// Key used for publish requests.
    pub publish_key: String,

    /// Key used for subscribe and read requests.
    pub subscribe_key: String,

    /// Client identity sent with every request.
    pub user_id: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Non-subscribe request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Honor HTTP(S)_PROXY environment variables.
    pub use_env_proxy: bool,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: "primary".to_string(),
            origin: "https://ps.pndsn.com".to_string(),
            publish_key: "demo".to_string(),
            subscribe_key: "demo".to_string(),
            user_id: "region-failover".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 10,
            use_env_proxy: true,
        }
    }
}

/// Failover behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FailoverConfig {
    /// Retries tolerated on one endpoint before moving to the next.
    pub max_attempts_per_endpoint: u32,

    /// Wall-clock bound for one backup candidate during a sweep, in seconds.
    pub sweep_deadline_secs: u64,

    /// Interval between primary recovery probes, in seconds.
    pub probe_interval_secs: u64,

    /// Probe the primary after failing over away from it.
    pub probe_enabled: bool,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_endpoint: 2,
            sweep_deadline_secs: 60,
            probe_interval_secs: 60,
            probe_enabled: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
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
