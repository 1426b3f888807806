//! # Envelope
//!
//! Wire structures and the decoded envelope.
//!
//! ## Wire Layout
//!
//! ```text
//! EnvelopeRaw
//! ├── 1: body_bytes       ── Body
//! │                          ├── 1:    messages (repeated AnyMessage)
//! │                          ├── 2:    memo
//! │                          ├── 3:    timeout_height
//! │                          ├── 1023: extension_options (critical)
//! │                          └── 2047: non_critical_extension_options
//! ├── 2: auth_info_bytes  ── AuthInfo
//! │                          ├── 1: signer_infos (repeated SignerInfo)
//! │                          └── 2: fee
//! └── 3: signatures (repeated)
//! ```
//!
//! ## Bit Stability
//!
//! A decoded `Envelope` keeps the exact `body_bytes` and `auth_info_bytes`
//! it was decoded from. Encoding it again without changes reuses them, so
//! the output equals the input byte for byte. Any mutator drops the cached
//! bytes of the sub-structure it touches.

use bytes::Bytes;
use prost::Message;
use shared_types::AnyMessage;

// =============================================================================
// WIRE STRUCTURES
// =============================================================================

/// Top-level wrapper as it travels on the wire.
#[derive(Clone, PartialEq, Message)]
pub struct EnvelopeRaw {
    #[prost(bytes = "bytes", tag = "1")]
    pub body_bytes: Bytes,

    #[prost(bytes = "bytes", tag = "2")]
    pub auth_info_bytes: Bytes,

    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

/// Messages plus body metadata.
#[derive(Clone, PartialEq, Message)]
pub struct Body {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<AnyMessage>,

    #[prost(string, tag = "2")]
    pub memo: String,

    /// Height after which the envelope is no longer valid. 0 means none.
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,

    #[prost(message, repeated, tag = "1023")]
    pub extension_options: Vec<AnyMessage>,

    #[prost(message, repeated, tag = "2047")]
    pub non_critical_extension_options: Vec<AnyMessage>,
}

/// Signer descriptors and fee.
#[derive(Clone, PartialEq, Message)]
pub struct AuthInfo {
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: Vec<SignerInfo>,

    #[prost(message, optional, tag = "2")]
    pub fee: Option<Fee>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignerInfo {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<AnyMessage>,

    #[prost(int32, tag = "2")]
    pub sign_mode: i32,

    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct Fee {
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,

    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,

    #[prost(string, tag = "3")]
    pub payer: String,

    #[prost(string, tag = "4")]
    pub granter: String,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: String,

    #[prost(string, tag = "2")]
    pub amount: String,
}

// =============================================================================
// DECODED ENVELOPE
// =============================================================================

/// An ordered batch of domain messages plus authorization metadata.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    body: Body,
    auth_info: AuthInfo,
    signatures: Vec<Vec<u8>>,

    /// Exact bytes `body` was decoded from, while unmodified.
    body_bytes: Option<Bytes>,
    /// Exact bytes `auth_info` was decoded from, while unmodified.
    auth_info_bytes: Option<Bytes>,

    body_has_unknown_non_criticals: bool,
}

impl Envelope {
    /// Envelope built in memory, with nothing cached.
    pub fn new(body: Body, auth_info: AuthInfo, signatures: Vec<Vec<u8>>) -> Self {
        Self {
            body,
            auth_info,
            signatures,
            ..Self::default()
        }
    }

    /// Envelope produced by the decoder, keeping the source slices.
    pub(crate) fn decoded(
        raw: EnvelopeRaw,
        body: Body,
        auth_info: AuthInfo,
        body_has_unknown_non_criticals: bool,
    ) -> Self {
        Self {
            body,
            auth_info,
            signatures: raw.signatures,
            body_bytes: Some(raw.body_bytes),
            auth_info_bytes: Some(raw.auth_info_bytes),
            body_has_unknown_non_criticals,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn messages(&self) -> &[AnyMessage] {
        &self.body.messages
    }

    pub fn memo(&self) -> &str {
        &self.body.memo
    }

    pub fn timeout_height(&self) -> u64 {
        self.body.timeout_height
    }

    pub fn extension_options(&self) -> &[AnyMessage] {
        &self.body.extension_options
    }

    pub fn non_critical_extension_options(&self) -> &[AnyMessage] {
        &self.body.non_critical_extension_options
    }

    pub fn signer_infos(&self) -> &[SignerInfo] {
        &self.auth_info.signer_infos
    }

    pub fn fee(&self) -> Option<&Fee> {
        self.auth_info.fee.as_ref()
    }

    pub fn signatures(&self) -> &[Vec<u8>] {
        &self.signatures
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn auth_info(&self) -> &AuthInfo {
        &self.auth_info
    }

    /// Whether the body carried unknown non-critical fields when decoded.
    pub fn body_has_unknown_non_criticals(&self) -> bool {
        self.body_has_unknown_non_criticals
    }

    /// Body bytes: the decoded slice if unmodified, else a fresh encoding.
    pub fn body_bytes(&self) -> Bytes {
        match &self.body_bytes {
            Some(bytes) => bytes.clone(),
            None => Bytes::from(self.body.encode_to_vec()),
        }
    }

    /// Auth-info bytes: the decoded slice if unmodified, else a fresh encoding.
    pub fn auth_info_bytes(&self) -> Bytes {
        match &self.auth_info_bytes {
            Some(bytes) => bytes.clone(),
            None => Bytes::from(self.auth_info.encode_to_vec()),
        }
    }

    /// Wire wrapper for this envelope.
    pub fn to_raw(&self) -> EnvelopeRaw {
        EnvelopeRaw {
            body_bytes: self.body_bytes(),
            auth_info_bytes: self.auth_info_bytes(),
            signatures: self.signatures.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    fn body_mut(&mut self) -> &mut Body {
        self.body_bytes = None;
        self.body_has_unknown_non_criticals = false;
        &mut self.body
    }

    fn auth_info_mut(&mut self) -> &mut AuthInfo {
        self.auth_info_bytes = None;
        &mut self.auth_info
    }

    pub fn set_messages(&mut self, messages: Vec<AnyMessage>) {
        self.body_mut().messages = messages;
    }

    pub fn set_memo(&mut self, memo: impl Into<String>) {
        self.body_mut().memo = memo.into();
    }

    pub fn set_timeout_height(&mut self, height: u64) {
        self.body_mut().timeout_height = height;
    }

    pub fn set_extension_options(&mut self, options: Vec<AnyMessage>) {
        self.body_mut().extension_options = options;
    }

    pub fn set_non_critical_extension_options(&mut self, options: Vec<AnyMessage>) {
        self.body_mut().non_critical_extension_options = options;
    }

    pub fn set_signer_infos(&mut self, infos: Vec<SignerInfo>) {
        self.auth_info_mut().signer_infos = infos;
    }

    pub fn set_fee(&mut self, fee: Option<Fee>) {
        self.auth_info_mut().fee = fee;
    }

    /// Signatures are not part of the cached sub-structures.
    pub fn set_signatures(&mut self, signatures: Vec<Vec<u8>>) {
        self.signatures = signatures;
    }
}

/// Logical equality: same body, auth-info and signatures.
impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
            && self.auth_info == other.auth_info
            && self.signatures == other.signatures
    }
}
