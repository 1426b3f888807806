//! # Domain Messages
//!
//! A domain message is a typed, `prost`-serializable unit of application
//! intent. Every message type names itself with a stable type identifier,
//! which is what envelopes carry on the wire and what the router keys on.
//!
//! `AnyMessage` is the type-tagged container: the identifier plus the
//! encoded payload. It lets the codec and router move messages around
//! without knowing their concrete type.

use prost::Message;
use thiserror::Error;

/// Contract for every message that can travel inside an envelope.
///
/// ```rust,ignore
/// #[derive(Clone, PartialEq, ::prost::Message)]
/// pub struct Ping {
///     #[prost(string, tag = "1")]
///     pub nonce: String,
/// }
///
/// impl DomainMessage for Ping {
///     const TYPE_ID: &'static str = "svc.Ping";
/// }
/// ```
pub trait DomainMessage: Message + Default + Clone + Send + Sync + 'static {
    /// Stable schema identifier.
    const TYPE_ID: &'static str;

    /// Wrap this message into its type-tagged container.
    fn to_any(&self) -> AnyMessage {
        AnyMessage::pack(self)
    }
}

/// Errors raised while packing or unpacking a type-tagged message.
#[derive(Debug, Error)]
pub enum MessageError {
    /// The container holds a different message type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// The payload is not a valid encoding of the expected type.
    #[error("failed to decode {type_id}: {source}")]
    Decode {
        type_id: String,
        #[source]
        source: prost::DecodeError,
    },
}

/// Type-tagged polymorphic container.
///
/// Field 1 holds the type identifier and field 2 the encoded payload.
#[derive(Clone, PartialEq, Eq, Hash, Message)]
pub struct AnyMessage {
    /// Type identifier of the packed message.
    #[prost(string, tag = "1")]
    pub type_url: String,

    /// Encoded message payload.
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

impl AnyMessage {
    /// Build a container from raw parts.
    pub fn new(type_url: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }

    /// Encode `msg` and tag it with its type identifier.
    pub fn pack<M: DomainMessage>(msg: &M) -> Self {
        Self {
            type_url: M::TYPE_ID.to_string(),
            value: msg.encode_to_vec(),
        }
    }

    /// Decode the payload as `M`, checking the type tag first.
    pub fn unpack<M: DomainMessage>(&self) -> Result<M, MessageError> {
        if !self.is::<M>() {
            return Err(MessageError::TypeMismatch {
                expected: M::TYPE_ID,
                found: self.type_url.clone(),
            });
        }

        M::decode(self.value.as_slice()).map_err(|source| MessageError::Decode {
            type_id: self.type_url.clone(),
            source,
        })
    }

    /// Type identifier of the packed message.
    pub fn type_id(&self) -> &str {
        &self.type_url
    }

    /// Whether this container holds an `M`.
    pub fn is<M: DomainMessage>(&self) -> bool {
        self.type_url == M::TYPE_ID
    }
}
