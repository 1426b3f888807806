//! Error types for the envelope codec.

use crate::domain::wire::{WireError, WireType};
use thiserror::Error;

/// Structural violations found before any semantic parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingViolation {
    /// Top-level envelope fields must all be length-delimited.
    #[error("expected length-delimited wire type for field {field}, got {found:?}")]
    WireType { field: u32, found: WireType },

    /// Top-level fields must appear in ascending order.
    #[error("field {field} appears after field {previous}; fields must be ascending")]
    FieldOrder { field: u32, previous: u32 },

    /// Field 1 or 2 appears more than once.
    #[error("field {field} appears more than once; only field 3 may repeat")]
    RepeatedField { field: u32 },

    /// Field 1 or 2 is present with an empty payload.
    #[error("field {field} is present but empty; empty fields must be omitted")]
    EmptyField { field: u32 },

    /// Length prefix used more bytes than needed.
    #[error("length prefix for field {field} is not minimal: read {used} bytes, only need {minimal}")]
    NonMinimalLength {
        field: u32,
        used: usize,
        minimal: usize,
    },

    /// Bytes cannot be framed as protobuf fields at all.
    #[error("malformed wire data: {0}")]
    Malformed(#[from] WireError),

    /// Input exceeds the configured limit.
    #[error("envelope of {size} bytes exceeds limit of {max}")]
    TooLarge { size: usize, max: usize },

    /// A decoded envelope carries no messages.
    #[error("envelope carries no messages")]
    NoMessages,
}

/// All errors the codec can surface.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Rejected by the structural pass.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(#[from] EncodingViolation),

    /// A field the schema does not know, where unknown fields are not allowed.
    #[error("unknown field {field} in {message}")]
    UnknownField { message: &'static str, field: u32 },

    /// A known field whose wire type does not match the schema.
    #[error("field {field} in {message} has wire type {found:?}, expected length-delimited")]
    WireTypeMismatch {
        message: &'static str,
        field: u32,
        found: WireType,
    },

    /// `prost` rejected a sub-structure.
    #[error("failed to unmarshal {target}: {source}")]
    Unmarshal {
        target: &'static str,
        #[source]
        source: prost::DecodeError,
    },
}

impl CodecError {
    /// Whether the failure came from the structural pass.
    pub fn is_invalid_encoding(&self) -> bool {
        matches!(self, Self::InvalidEncoding(_))
    }

    /// Whether the failure was an unknown-field rejection.
    pub fn is_unknown_field(&self) -> bool {
        matches!(self, Self::UnknownField { .. })
    }
}

impl From<WireError> for CodecError {
    fn from(err: WireError) -> Self {
        Self::InvalidEncoding(EncodingViolation::Malformed(err))
    }
}
