//! Configuration for the envelope codec.

use serde::{Deserialize, Serialize};
use shared_types::ConfigError;

/// Default upper bound on envelope size: 4 MiB.
pub const DEFAULT_MAX_ENVELOPE_BYTES: usize = 4 * 1024 * 1024;

/// Codec configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Envelopes larger than this are rejected before the canonical pass.
    pub max_envelope_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_envelope_bytes: DEFAULT_MAX_ENVELOPE_BYTES,
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_envelope_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_envelope_bytes",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
