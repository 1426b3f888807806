//! # Router Builder
//!
//! The registration phase. Handlers and extractors are added here; `build`
//! hands the finished table to a [`MsgRouter`], which only reads it. There
//! is no way back from a router to its builder, so nothing can register
//! once dispatch has started.

use crate::config::RouterConfig;
use crate::domain::descriptor::{MethodDescriptor, ServiceDescriptor};
use crate::domain::errors::RouterError;
use crate::domain::extractor::{ErasedExtractor, ResultExtractor};
use crate::domain::route::{lookup_key, Phase, Route};
use crate::service::pipeline::ResultPipeline;
use crate::service::router::MsgRouter;
use dvs_01_envelope_codec::{EnvelopeCodec, MsgCodec};
use shared_types::DomainMessage;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registration-phase router.
pub struct RouterBuilder {
    config: RouterConfig,
    codec: Arc<dyn MsgCodec>,
    routes: HashMap<String, Route>,
    pipeline: ResultPipeline,
}

impl RouterBuilder {
    /// Builder using the default envelope codec.
    pub fn new(config: RouterConfig) -> Self {
        Self::with_codec(config, Arc::new(EnvelopeCodec::default()))
    }

    pub fn with_codec(config: RouterConfig, codec: Arc<dyn MsgCodec>) -> Self {
        Self {
            config,
            codec,
            routes: HashMap::new(),
            pipeline: ResultPipeline::new(),
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register one method of `service`, served by `implementation`.
    ///
    /// The key is the method's request type, suffixed when the method name
    /// marks it as a response-phase handler. An occupied key keeps its first
    /// registration; with `reject_duplicate_routes` set it is an error.
    pub fn register_handler<S: Send + Sync + 'static>(
        &mut self,
        service: &ServiceDescriptor<S>,
        method: &MethodDescriptor<S>,
        implementation: Arc<S>,
    ) -> Result<(), RouterError> {
        let phase = if self.config.is_response_method(method.name()) {
            Phase::Response
        } else {
            Phase::Request
        };
        let key = lookup_key(
            method.request_type(),
            phase,
            &self.config.response_key_suffix,
        );

        if let Some(existing) = self.routes.get(&key) {
            if self.config.reject_duplicate_routes {
                return Err(RouterError::DuplicateRoute { key });
            }
            warn!(
                key = %key,
                kept = %format!("{}/{}", existing.service(), existing.method()),
                dropped = %format!("{}/{}", service.name(), method.name()),
                "[dvs-02] handler already registered, keeping the first"
            );
            return Ok(());
        }

        debug!(
            key = %key,
            service = service.name(),
            method = method.name(),
            "[dvs-02] registered handler"
        );
        self.routes.insert(
            key.clone(),
            Route {
                key,
                type_id: method.request_type(),
                phase,
                service: service.name(),
                method: method.name(),
                invoke: method.bind(implementation),
            },
        );
        Ok(())
    }

    /// Register every method of `service`.
    pub fn register_service<S: Send + Sync + 'static>(
        &mut self,
        service: &ServiceDescriptor<S>,
        implementation: Arc<S>,
    ) -> Result<(), RouterError> {
        for method in service.methods() {
            self.register_handler(service, method, Arc::clone(&implementation))?;
        }
        Ok(())
    }

    /// Register a typed result extractor. Last registration wins.
    pub fn register_extractor<M, E>(&mut self, extractor: E) -> &mut Self
    where
        M: DomainMessage,
        E: ResultExtractor<M>,
    {
        self.pipeline.register_extractor::<M, E>(extractor);
        self
    }

    /// Register an erased result extractor. Last registration wins.
    pub fn register_extractor_for(
        &mut self,
        type_id: impl Into<String>,
        extractor: Arc<dyn ErasedExtractor>,
    ) -> &mut Self {
        self.pipeline.register_extractor_for(type_id, extractor);
        self
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Seal registration.
    pub fn build(self) -> MsgRouter {
        info!(routes = self.routes.len(), "[dvs-02] router ready");
        MsgRouter::new(self.config, self.codec, self.routes, self.pipeline)
    }
}

impl std::fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("config", &self.config)
            .field("routes", &self.routes.len())
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}
