//! # Envelope Codec Service
//!
//! Default implementation of [`MsgCodec`].
//!
//! ## Decode Pipeline
//!
//! ```text
//! bytes ─► size limit ─► canonical pass ─► wrapper unknown fields (strict)
//!       ─► EnvelopeRaw ─► Body   (non-critical unknowns tolerated, flagged)
//!                      ─► AuthInfo (strict)
//!       ─► Envelope { cached body_bytes, cached auth_info_bytes }
//! ```
//!
//! Nothing is unmarshalled until the canonical pass has accepted the bytes.

use crate::config::CodecConfig;
use crate::domain::canonical::reject_non_canonical;
use crate::domain::envelope::{AuthInfo, Body, Envelope, EnvelopeRaw};
use crate::domain::errors::{CodecError, EncodingViolation};
use crate::domain::unknown_fields::{
    check_unknown_fields, UnknownFieldPolicy, AUTH_INFO_SCHEMA, BODY_SCHEMA, ENVELOPE_SCHEMA,
};
use crate::ports::inbound::MsgCodec;
use bytes::Bytes;
use prost::Message;
use shared_types::AnyMessage;
use tracing::{debug, warn};

/// Canonical envelope codec.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeCodec {
    config: CodecConfig,
}

impl EnvelopeCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode from an owned buffer. The envelope's cached sub-structure bytes
    /// are slices of `bytes`, no copy is made.
    pub fn decode_bytes(&self, bytes: Bytes) -> Result<Envelope, CodecError> {
        self.check_size(bytes.len())?;
        self.decode_within_limit(bytes)
    }

    /// Decode input whose size has already been checked.
    fn decode_within_limit(&self, bytes: Bytes) -> Result<Envelope, CodecError> {
        reject_non_canonical(&bytes).inspect_err(|e| {
            debug!("[dvs-01] rejected non-canonical envelope: {}", e);
        })?;
        check_unknown_fields(&bytes, &ENVELOPE_SCHEMA, UnknownFieldPolicy::Strict)?;

        let raw = EnvelopeRaw::decode(bytes).map_err(|source| CodecError::Unmarshal {
            target: "EnvelopeRaw",
            source,
        })?;

        let body_has_unknown_non_criticals = check_unknown_fields(
            &raw.body_bytes,
            &BODY_SCHEMA,
            UnknownFieldPolicy::AllowNonCritical,
        )?;
        let body = Body::decode(raw.body_bytes.clone()).map_err(|source| CodecError::Unmarshal {
            target: "Body",
            source,
        })?;

        check_unknown_fields(
            &raw.auth_info_bytes,
            &AUTH_INFO_SCHEMA,
            UnknownFieldPolicy::Strict,
        )?;
        let auth_info =
            AuthInfo::decode(raw.auth_info_bytes.clone()).map_err(|source| {
                CodecError::Unmarshal {
                    target: "AuthInfo",
                    source,
                }
            })?;

        if body_has_unknown_non_criticals {
            debug!("[dvs-01] body carries unknown non-critical fields");
        }
        debug!(
            messages = body.messages.len(),
            signatures = raw.signatures.len(),
            "[dvs-01] decoded envelope"
        );

        Ok(Envelope::decoded(
            raw,
            body,
            auth_info,
            body_has_unknown_non_criticals,
        ))
    }

    fn check_size(&self, size: usize) -> Result<(), CodecError> {
        let max = self.config.max_envelope_bytes;
        if size > max {
            warn!(size, max, "[dvs-01] envelope exceeds size limit");
            return Err(EncodingViolation::TooLarge { size, max }.into());
        }
        Ok(())
    }
}

impl MsgCodec for EnvelopeCodec {
    /// Borrowed input is copied once, after the size check; the cached
    /// sub-structure bytes are slices of that copy.
    fn decode(&self, bytes: &[u8]) -> Result<Envelope, CodecError> {
        self.check_size(bytes.len())?;
        self.decode_within_limit(Bytes::copy_from_slice(bytes))
    }

    fn encode(&self, envelope: &Envelope) -> Result<Vec<u8>, CodecError> {
        // prost writes fields in tag order with minimal length prefixes.
        let encoded = envelope.to_raw().encode_to_vec();
        self.check_size(encoded.len())?;
        Ok(encoded)
    }

    fn encode_messages(&self, messages: &[AnyMessage]) -> Result<Vec<u8>, CodecError> {
        let body = Body {
            messages: messages.to_vec(),
            ..Body::default()
        };
        self.encode(&Envelope::new(body, AuthInfo::default(), Vec::new()))
    }
}
