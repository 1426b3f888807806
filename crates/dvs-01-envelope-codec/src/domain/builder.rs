//! Fluent construction of envelopes.

use crate::domain::envelope::{AuthInfo, Body, Envelope, Fee, SignerInfo};
use shared_types::{AnyMessage, DomainMessage};

/// Builder for an [`Envelope`].
///
/// ```ignore
/// let env = EnvelopeBuilder::new()
///     .message(&Ping { nonce: 1 })
///     .memo("round 7")
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvelopeBuilder {
    body: Body,
    auth_info: AuthInfo,
    signatures: Vec<Vec<u8>>,
}

impl EnvelopeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one typed message.
    pub fn message<M: DomainMessage>(mut self, msg: &M) -> Self {
        self.body.messages.push(msg.to_any());
        self
    }

    /// Append already-packed messages, keeping their order.
    pub fn messages(mut self, msgs: impl IntoIterator<Item = AnyMessage>) -> Self {
        self.body.messages.extend(msgs);
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.body.memo = memo.into();
        self
    }

    pub fn timeout_height(mut self, height: u64) -> Self {
        self.body.timeout_height = height;
        self
    }

    pub fn extension_options(mut self, options: Vec<AnyMessage>) -> Self {
        self.body.extension_options = options;
        self
    }

    pub fn non_critical_extension_options(mut self, options: Vec<AnyMessage>) -> Self {
        self.body.non_critical_extension_options = options;
        self
    }

    pub fn signer_info(mut self, info: SignerInfo) -> Self {
        self.auth_info.signer_infos.push(info);
        self
    }

    pub fn fee(mut self, fee: Fee) -> Self {
        self.auth_info.fee = Some(fee);
        self
    }

    pub fn signatures(mut self, signatures: Vec<Vec<u8>>) -> Self {
        self.signatures = signatures;
        self
    }

    pub fn build(self) -> Envelope {
        Envelope::new(self.body, self.auth_info, self.signatures)
    }
}
