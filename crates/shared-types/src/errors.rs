//! # Error Types
//!
//! Registered application errors. A `CodedError` names a codespace and a
//! numeric code that the node boundary reports back to its caller; anything
//! that is not coded is reported as an internal error.

use thiserror::Error;

/// Codespace used for errors that carry no registered code.
pub const UNDEFINED_CODESPACE: &str = "undefined";

/// Code reported for success.
pub const SUCCESS_CODE: u32 = 0;

/// Code reported for errors without a registered code.
pub const INTERNAL_CODE: u32 = 1;

/// A registered application error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{description}")]
pub struct CodedError {
    codespace: &'static str,
    code: u32,
    description: &'static str,
}

impl CodedError {
    /// Register a new coded error. Code 0 is reserved for success.
    pub const fn new(codespace: &'static str, code: u32, description: &'static str) -> Self {
        Self {
            codespace,
            code,
            description,
        }
    }

    pub const fn codespace(&self) -> &'static str {
        self.codespace
    }

    pub const fn code(&self) -> u32 {
        self.code
    }

    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Whether `other` is the same registered error.
    pub fn is(&self, other: &CodedError) -> bool {
        self.codespace == other.codespace && self.code == other.code
    }
}

/// Errors registered by the dispatch core itself.
pub mod sdk {
    use super::CodedError;

    pub const CODESPACE: &str = "sdk";

    pub const TX_DECODE: CodedError = CodedError::new(CODESPACE, 2, "tx parse error");
    pub const UNKNOWN_REQUEST: CodedError = CodedError::new(CODESPACE, 6, "unknown request");
    pub const INVALID_REQUEST: CodedError = CodedError::new(CODESPACE, 18, "invalid request");
    pub const PANIC: CodedError = CodedError::new(CODESPACE, 111, "panic");
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("cannot parse environment variable {var}: {reason}")]
    Env { var: &'static str, reason: String },
}

/// Walk an error chain and return the first registered error in it.
pub fn find_coded<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a CodedError> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(coded) = e.downcast_ref::<CodedError>() {
            return Some(coded);
        }
        current = e.source();
    }
    None
}
