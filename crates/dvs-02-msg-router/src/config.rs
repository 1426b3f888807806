//! Configuration for the message router.

use serde::{Deserialize, Serialize};
use shared_types::ConfigError;

/// Router configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Methods whose name contains this marker serve the response phase.
    pub response_method_marker: String,
    /// Appended to the type identifier to form response-phase keys.
    pub response_key_suffix: String,
    /// Fail registration on an occupied key instead of keeping the first.
    pub reject_duplicate_routes: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            response_method_marker: "DVSResponseHandler".to_string(),
            response_key_suffix: "#response".to_string(),
            reject_duplicate_routes: false,
        }
    }
}

impl RouterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.response_method_marker.is_empty() {
            return Err(ConfigError::Invalid {
                field: "response_method_marker",
                reason: "must not be empty".to_string(),
            });
        }
        // An empty suffix would put both phases in one namespace.
        if self.response_key_suffix.is_empty() {
            return Err(ConfigError::Invalid {
                field: "response_key_suffix",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Whether `method` serves the response phase.
    pub fn is_response_method(&self, method: &str) -> bool {
        method.contains(&self.response_method_marker)
    }
}
