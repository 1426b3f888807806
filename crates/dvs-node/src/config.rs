//! # Node Configuration
//!
//! One struct for the router, the codec, logging and the node boundary.

use dvs_01_envelope_codec::{CodecConfig, EnvelopeCodec};
use dvs_02_msg_router::{RouterBuilder, RouterConfig};
use dvs_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use shared_types::ConfigError;
use std::collections::HashSet;
use std::env;
use std::sync::Arc;

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Application name reported by `info`.
    pub name: String,
    /// Application version reported by `info`.
    pub version: String,
    /// Report full error detail in response logs.
    pub trace: bool,
    /// `type.key` pairs to mark for indexing. Empty marks everything.
    pub index_events: Vec<String>,
    pub router: RouterConfig,
    pub codec: CodecConfig,
    pub telemetry: TelemetryConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: "dvs-node".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            trace: false,
            index_events: Vec::new(),
            router: RouterConfig::default(),
            codec: CodecConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DVS_APP_NAME`: Application name (default: dvs-node)
    /// - `DVS_TRACE`: Full error detail in logs (default: false)
    /// - `DVS_INDEX_EVENTS`: Comma-separated `type.key` pairs (default: all)
    /// - `DVS_MAX_ENVELOPE_BYTES`: Codec size limit (default: 4 MiB)
    /// - `DVS_REJECT_DUPLICATE_ROUTES`: Fail on duplicate handlers (default: false)
    /// - plus the telemetry variables read by `TelemetryConfig::from_env`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            telemetry: TelemetryConfig::from_lookup(&lookup),
            ..Self::default()
        };

        if let Some(name) = lookup("DVS_APP_NAME") {
            config.name = name;
        }
        if let Some(trace) = lookup("DVS_TRACE") {
            config.trace = parse_bool("DVS_TRACE", &trace)?;
        }
        if let Some(events) = lookup("DVS_INDEX_EVENTS") {
            config.index_events = events
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(max) = lookup("DVS_MAX_ENVELOPE_BYTES") {
            config.codec.max_envelope_bytes = max.parse().map_err(|e| ConfigError::Env {
                var: "DVS_MAX_ENVELOPE_BYTES",
                reason: format!("{e}"),
            })?;
        }
        if let Some(reject) = lookup("DVS_REJECT_DUPLICATE_ROUTES") {
            config.router.reject_duplicate_routes =
                parse_bool("DVS_REJECT_DUPLICATE_ROUTES", &reject)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Invalid {
                field: "name",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(bad) = self
            .index_events
            .iter()
            .find(|entry| !entry.contains('.'))
        {
            return Err(ConfigError::Invalid {
                field: "index_events",
                reason: format!("{bad:?} is not of the form type.key"),
            });
        }
        self.router.validate()?;
        self.codec.validate()
    }

    /// Index set for `mark_events_to_index`.
    pub fn index_set(&self) -> HashSet<String> {
        self.index_events.iter().cloned().collect()
    }

    /// Router builder wired with this configuration's codec.
    pub fn router_builder(&self) -> RouterBuilder {
        RouterBuilder::with_codec(
            self.router.clone(),
            Arc::new(EnvelopeCodec::new(self.codec.clone())),
        )
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::Env {
            var,
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}
