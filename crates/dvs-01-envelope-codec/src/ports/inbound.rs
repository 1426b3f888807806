//! # Inbound Ports
//!
//! The codec API consumed by the message router.

use crate::domain::envelope::Envelope;
use crate::domain::errors::{CodecError, EncodingViolation};
use shared_types::AnyMessage;

/// Encode and decode canonical envelopes.
///
/// Implementations must be thread-safe: the router shares one codec across
/// every concurrent dispatch.
pub trait MsgCodec: Send + Sync {
    /// Decode envelope bytes.
    ///
    /// The canonical-form pass runs before any sub-structure is unmarshalled.
    fn decode(&self, bytes: &[u8]) -> Result<Envelope, CodecError>;

    /// Encode an envelope, reusing the decoded sub-structure bytes when the
    /// envelope was not modified.
    fn encode(&self, envelope: &Envelope) -> Result<Vec<u8>, CodecError>;

    /// Encode a fresh envelope carrying `messages` and nothing else.
    fn encode_messages(&self, messages: &[AnyMessage]) -> Result<Vec<u8>, CodecError>;

    /// Decode and return the first message of the envelope.
    fn decode_first_message(&self, bytes: &[u8]) -> Result<AnyMessage, CodecError> {
        let envelope = self.decode(bytes)?;
        envelope
            .messages()
            .first()
            .cloned()
            .ok_or(CodecError::InvalidEncoding(EncodingViolation::NoMessages))
    }
}
