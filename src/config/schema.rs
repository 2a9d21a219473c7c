//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the redirect
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::engine::options::RedirectOptions;
use crate::rules::RedirectRule;

/// Root configuration for the redirect service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Listener configuration (bind address, scheme detection).
    pub listener: ListenerConfig,

    /// Engine switches (`enabled`, `forcehttps`, `excludes`).
    pub options: RedirectOptions,

    /// Ordered redirect rules; the first match wins.
    pub redirects: Vec<RedirectRule>,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Grace period for in-flight requests on shutdown, in seconds.
    pub shutdown_timeout_secs: u64,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            options: RedirectOptions::default(),
            redirects: Vec::new(),
            observability: ObservabilityConfig::default(),
            shutdown_timeout_secs: 10,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Scheme assumed when neither the request target nor a trusted
    /// `X-Forwarded-Proto` header names one.
    pub default_scheme: String,

    /// Honour `X-Forwarded-Proto` from a TLS-terminating proxy.
    pub trust_forwarded_proto: bool,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            default_scheme: "http".to_string(),
            trust_forwarded_proto: true,
            request_timeout_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
