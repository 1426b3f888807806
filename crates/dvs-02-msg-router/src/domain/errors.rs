//! Error types for the message router.

use dvs_01_envelope_codec::CodecError;
use shared_types::errors::sdk;
use shared_types::{find_coded, CodedError, MessageError};
use thiserror::Error;

/// Error returned by a handler implementation.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A registered application error.
    #[error("{0}")]
    Coded(#[from] CodedError),

    /// A registered application error with call-site detail.
    #[error("{detail}: {source}")]
    Wrapped {
        detail: String,
        #[source]
        source: CodedError,
    },

    /// Any other failure.
    #[error("{0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The handler panicked; caught at the dispatch boundary.
    #[error("handler {method} panicked: {message}")]
    Panicked {
        method: &'static str,
        message: String,
    },
}

impl HandlerError {
    /// Attach detail to a registered error.
    pub fn wrap(source: CodedError, detail: impl Into<String>) -> Self {
        Self::Wrapped {
            detail: detail.into(),
            source,
        }
    }

    pub fn failed(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Failed(err.into())
    }
}

/// Error returned by a custom result extractor.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error(transparent)]
    Message(#[from] MessageError),

    #[error("{0}")]
    Failed(String),
}

/// All errors the router can surface.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The envelope failed to decode.
    #[error("envelope decode failed: {0}")]
    Codec(#[from] CodecError),

    /// The matched message payload is not a valid encoding of the handler's
    /// request type.
    #[error("message decode failed: {0}")]
    Message(#[from] MessageError),

    /// No route for the resolved lookup key.
    #[error("no handler found for {key}")]
    HandlerNotFound { key: String },

    /// The handler returned an error. Forwarded untouched.
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// The base context was cancelled or past its deadline before dispatch.
    #[error("request context cancelled")]
    Cancelled,

    /// A second registration for an occupied key, with duplicates rejected.
    #[error("a handler is already registered for {key}")]
    DuplicateRoute { key: String },
}

impl RouterError {
    /// Registered application error this failure reports as, if any.
    pub fn registered(&self) -> Option<CodedError> {
        match self {
            Self::Codec(_) | Self::Message(_) => Some(sdk::TX_DECODE),
            Self::HandlerNotFound { .. } => Some(sdk::UNKNOWN_REQUEST),
            Self::Handler(HandlerError::Panicked { .. }) => Some(sdk::PANIC),
            Self::Handler(_) => find_coded(self).copied(),
            Self::Cancelled | Self::DuplicateRoute { .. } => None,
        }
    }

    pub fn is_handler_not_found(&self) -> bool {
        matches!(self, Self::HandlerNotFound { .. })
    }

    pub fn is_invalid_encoding(&self) -> bool {
        matches!(self, Self::Codec(e) if e.is_invalid_encoding())
    }
}
