//! # Message Router
//!
//! Serving-phase router. Decodes envelopes, resolves the phase-aware lookup
//! key, runs the matched handler and wraps its output.
//!
//! ## Dispatch
//!
//! ```text
//! raw ─► codec.decode ─► first message with a route for its key
//!     ─► handler(ctx, message) ─► pipeline.wrap_result ─► DispatchResult
//! ```
//!
//! The route table is immutable after `RouterBuilder::build`, so concurrent
//! dispatches share it without locking.

use crate::config::RouterConfig;
use crate::domain::errors::RouterError;
use crate::domain::route::{lookup_key, Phase, Route, RouteInfo};
use crate::ports::inbound::MessageRouter;
use crate::service::pipeline::{DispatchResult, ResultPipeline};
use async_trait::async_trait;
use dvs_01_envelope_codec::{CodecError, EncodingViolation, MsgCodec};
use shared_types::{AnyMessage, RequestContext};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, Instrument};

/// Dispatching router.
pub struct MsgRouter {
    config: RouterConfig,
    codec: Arc<dyn MsgCodec>,
    routes: HashMap<String, Route>,
    pipeline: ResultPipeline,
}

impl MsgRouter {
    pub(crate) fn new(
        config: RouterConfig,
        codec: Arc<dyn MsgCodec>,
        routes: HashMap<String, Route>,
        pipeline: ResultPipeline,
    ) -> Self {
        Self {
            config,
            codec,
            routes,
            pipeline,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn codec(&self) -> &Arc<dyn MsgCodec> {
        &self.codec
    }

    pub fn pipeline(&self) -> &ResultPipeline {
        &self.pipeline
    }

    /// Lookup key for `type_id` under the phase `ctx` selects.
    pub fn key_for(&self, ctx: &RequestContext, type_id: &str) -> String {
        lookup_key(type_id, Phase::of(ctx), &self.config.response_key_suffix)
    }

    /// Route that `dispatch` would use for `msg` under `ctx`.
    pub fn get_handler(&self, ctx: &RequestContext, msg: &AnyMessage) -> Option<&Route> {
        self.routes.get(&self.key_for(ctx, msg.type_id()))
    }

    /// Decode `raw` and return the request-phase route of its first routable
    /// message.
    pub fn get_handler_by_data(&self, raw: &[u8]) -> Result<&Route, RouterError> {
        let envelope = self.codec.decode(raw)?;
        envelope
            .messages()
            .iter()
            .find_map(|msg| self.routes.get(msg.type_id()))
            .ok_or_else(|| RouterError::HandlerNotFound {
                key: first_type_id(envelope.messages()),
            })
    }

    /// Decode `raw` and return its first message.
    pub fn decode_first_message(&self, raw: &[u8]) -> Result<AnyMessage, RouterError> {
        Ok(self.codec.decode_first_message(raw)?)
    }

    /// Registered routes, sorted by key.
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut routes: Vec<_> = self.routes.values().map(Route::info).collect();
        routes.sort_by(|a, b| a.key.cmp(&b.key));
        routes
    }

    /// Decode `raw`, run the handler for its first routable message and wrap
    /// the output.
    pub async fn dispatch(
        &self,
        ctx: RequestContext,
        raw: &[u8],
    ) -> Result<DispatchResult, RouterError> {
        if ctx.is_cancelled() {
            return Err(RouterError::Cancelled);
        }

        let envelope = self.codec.decode(raw)?;
        if envelope.messages().is_empty() {
            return Err(CodecError::from(EncodingViolation::NoMessages).into());
        }

        let phase = Phase::of(&ctx);
        let (route, msg) = envelope
            .messages()
            .iter()
            .find_map(|msg| self.get_handler(&ctx, msg).map(|route| (route, msg)))
            .ok_or_else(|| RouterError::HandlerNotFound {
                key: self.key_for(&ctx, &first_type_id(envelope.messages())),
            })?;

        let span = tracing::debug_span!(
            parent: ctx.span(),
            "dispatch",
            key = %route.key(),
            phase = %phase,
        );
        async {
            debug!(
                service = route.service(),
                method = route.method(),
                "[dvs-02] invoking handler"
            );
            let output = route.call(ctx.clone(), msg.clone()).await;
            if let Err(e) = &output {
                debug!(error = %e, "[dvs-02] handler failed");
            }
            self.pipeline.wrap_result(&ctx, output)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl MessageRouter for MsgRouter {
    async fn dispatch(
        &self,
        ctx: RequestContext,
        raw: &[u8],
    ) -> Result<DispatchResult, RouterError> {
        MsgRouter::dispatch(self, ctx, raw).await
    }

    fn routes(&self) -> Vec<RouteInfo> {
        MsgRouter::routes(self)
    }
}

impl std::fmt::Debug for MsgRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MsgRouter")
            .field("config", &self.config)
            .field("routes", &self.routes.len())
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

fn first_type_id(messages: &[AnyMessage]) -> String {
    messages
        .first()
        .map(|msg| msg.type_id().to_string())
        .unwrap_or_default()
}
