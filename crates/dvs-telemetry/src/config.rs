//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to the root span.
    pub service_name: String,

    /// `EnvFilter` directive, e.g. `info` or `dvs_02_msg_router=debug,info`.
    pub log_level: String,

    /// Emit JSON lines instead of the human-readable format.
    pub json_logs: bool,

    /// Include file and line in each record.
    pub with_source_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "dvs-node".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_source_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DVS_SERVICE_NAME`: Service name (default: dvs-node)
    /// - `DVS_LOG_LEVEL` or `RUST_LOG`: Filter directive (default: info)
    /// - `DVS_JSON_LOGS`: JSON output (default: false, true in containers)
    /// - `DVS_LOG_SOURCE`: Include file and line (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("DVS_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("DVS_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("DVS_JSON_LOGS")
                .map(|v| is_truthy(&v))
                .unwrap_or(is_container),

            with_source_location: lookup("DVS_LOG_SOURCE")
                .map(|v| is_truthy(&v))
                .unwrap_or(defaults.with_source_location),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
