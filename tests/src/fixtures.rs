//! # Shared Fixtures
//!
//! A small ping service registered in both phases, its extractor, and
//! helpers for building envelopes and routers around it.

use dvs_01_envelope_codec::domain::wire::{encode_tag, encode_varint};
use dvs_01_envelope_codec::{EnvelopeCodec, MsgCodec, WireType};
use dvs_02_msg_router::{
    ExtractorError, HandlerError, MethodDescriptor, MsgRouter, ResultExtractor, RouterBuilder,
    RouterConfig, ServiceDescriptor,
};
use prost::Message;
use sha2::{Digest, Sha256};
use shared_types::errors::sdk;
use shared_types::{AnyMessage, DomainMessage, Event, KvStore, MemStore, RequestContext};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// MESSAGES
// =============================================================================

#[derive(Clone, PartialEq, Message)]
pub struct Ping {
    #[prost(uint64, tag = "1")]
    pub nonce: u64,
}

impl DomainMessage for Ping {
    const TYPE_ID: &'static str = "svc.Ping";
}

#[derive(Clone, PartialEq, Message)]
pub struct Pong {
    #[prost(bool, tag = "1")]
    pub pong: bool,
    #[prost(uint64, tag = "2")]
    pub nonce: u64,
    /// `"request"` or `"response"`, whichever handler answered.
    #[prost(string, tag = "3")]
    pub phase: String,
    /// Tag of the server instance that answered.
    #[prost(string, tag = "4")]
    pub server: String,
}

impl DomainMessage for Pong {
    const TYPE_ID: &'static str = "svc.Pong";
}

/// A type nothing is registered for.
#[derive(Clone, PartialEq, Message)]
pub struct Unknown {
    #[prost(uint32, tag = "1")]
    pub n: u32,
}

impl DomainMessage for Unknown {
    const TYPE_ID: &'static str = "svc.Unknown";
}

// =============================================================================
// SERVICE
// =============================================================================

/// Nonce the server refuses with a registered error.
pub const REFUSED_NONCE: u64 = 404;

/// Nonce the server panics on.
pub const PANIC_NONCE: u64 = 500;

#[derive(Debug, Default)]
pub struct PingServer {
    tag: String,
    request_calls: AtomicUsize,
    response_calls: AtomicUsize,
    /// Validated digests by nonce, written by the response handler.
    store: MemStore,
}

impl PingServer {
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn request_calls(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }

    pub fn response_calls(&self) -> usize {
        self.response_calls.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> &MemStore {
        &self.store
    }

    pub fn round_key(nonce: u64) -> Vec<u8> {
        format!("round/{nonce:020}").into_bytes()
    }

    async fn ping(&self, ctx: RequestContext, req: Ping) -> Result<Pong, HandlerError> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        match req.nonce {
            REFUSED_NONCE => return Err(HandlerError::wrap(sdk::INVALID_REQUEST, "nonce refused")),
            PANIC_NONCE => panic!("nonce {} is cursed", req.nonce),
            _ => {}
        }
        ctx.emit_event(
            Event::new("ping")
                .with_attribute("nonce", req.nonce.to_string())
                .with_attribute("height", ctx.height().to_string()),
        );
        Ok(self.pong(req.nonce, "request"))
    }

    async fn on_response(&self, ctx: RequestContext, req: Ping) -> Result<Pong, HandlerError> {
        self.response_calls.fetch_add(1, Ordering::SeqCst);
        let validated = ctx
            .validated_response()
            .ok_or_else(|| HandlerError::from(sdk::INVALID_REQUEST))?;
        self.store
            .set(&Self::round_key(req.nonce), validated.hash.clone())
            .map_err(HandlerError::failed)?;
        ctx.emit_event(
            Event::new("pong").with_attribute("validated", hex::encode(&validated.hash)),
        );
        Ok(self.pong(req.nonce, "response"))
    }

    fn pong(&self, nonce: u64, phase: &str) -> Pong {
        Pong {
            pong: true,
            nonce,
            phase: phase.to_string(),
            server: self.tag.clone(),
        }
    }
}

pub fn ping_service() -> ServiceDescriptor<PingServer> {
    ServiceDescriptor::new("svc.PingService")
        .with_method(MethodDescriptor::unary(
            "Ping",
            |svc: Arc<PingServer>, ctx, req: Ping| async move { svc.ping(ctx, req).await },
        ))
        .with_method(MethodDescriptor::unary(
            "PingDVSResponseHandler",
            |svc: Arc<PingServer>, ctx, req: Ping| async move { svc.on_response(ctx, req).await },
        ))
}

// =============================================================================
// EXTRACTOR
// =============================================================================

/// Data is the encoded pong, digest its SHA-256.
pub struct PongDigest;

impl ResultExtractor<Pong> for PongDigest {
    fn get_data(&self, msg: &Pong) -> Result<Vec<u8>, ExtractorError> {
        Ok(msg.encode_to_vec())
    }

    fn get_digest(&self, msg: &Pong) -> Result<Vec<u8>, ExtractorError> {
        Ok(Sha256::digest(msg.encode_to_vec()).to_vec())
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Router with one `PingServer` registered, and the server itself.
pub fn ping_router(with_extractor: bool) -> (MsgRouter, Arc<PingServer>) {
    let server = Arc::new(PingServer::tagged("primary"));
    let mut builder = RouterBuilder::new(RouterConfig::default());
    builder
        .register_service(&ping_service(), Arc::clone(&server))
        .unwrap_or_else(|e| panic!("ping service registration failed: {e}"));
    if with_extractor {
        builder.register_extractor::<Pong, _>(PongDigest);
    }
    (builder.build(), server)
}

/// Canonical envelope bytes carrying `messages`.
pub fn envelope(messages: &[AnyMessage]) -> Vec<u8> {
    EnvelopeCodec::default()
        .encode_messages(messages)
        .unwrap_or_else(|e| panic!("fixture envelope failed to encode: {e}"))
}

pub fn ping_envelope(nonce: u64) -> Vec<u8> {
    envelope(&[Ping { nonce }.to_any()])
}

/// Append one length-delimited field.
pub fn bytes_field(number: u32, payload: &[u8], out: &mut Vec<u8>) {
    encode_tag(number, WireType::LengthDelimited, out);
    encode_varint(payload.len() as u64, out);
    out.extend_from_slice(payload);
}
