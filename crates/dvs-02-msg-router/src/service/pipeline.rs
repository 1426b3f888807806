//! # Result Pipeline
//!
//! Turns a handler's output into a [`DispatchResult`]: the encoded output,
//! the packed output, the context's accumulated events and, when an
//! extractor is registered for the output type, custom data and digest.

use crate::domain::errors::RouterError;
use crate::domain::extractor::{ErasedExtractor, ResultExtractor, Typed};
use shared_types::{AnyMessage, DomainMessage, Event, RequestContext};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Encoded output message.
    pub raw_bytes: Vec<u8>,
    pub log: String,
    /// Everything recorded in the context's event log at wrap time.
    pub events: Vec<Event>,
    /// Output message in its type-tagged container.
    pub packed_response: Option<AnyMessage>,
    pub custom_data: Option<Vec<u8>>,
    pub custom_digest: Option<Vec<u8>>,
}

impl DispatchResult {
    /// Events flattened to `(type, key, value)` rows.
    pub fn event_triples(&self) -> Vec<(String, String, String)> {
        self.events
            .iter()
            .flat_map(|event| {
                event
                    .triples()
                    .map(|(t, k, v)| (t.to_string(), k.to_string(), v.to_string()))
            })
            .collect()
    }
}

/// Wraps handler output; owns the extractor registry.
#[derive(Clone, Default)]
pub struct ResultPipeline {
    extractors: HashMap<String, Arc<dyn ErasedExtractor>>,
}

impl ResultPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extractor for outputs of type `M`. Last registration wins.
    pub fn register_extractor<M, E>(&mut self, extractor: E)
    where
        M: DomainMessage,
        E: ResultExtractor<M>,
    {
        self.register_extractor_for(M::TYPE_ID, Arc::new(Typed::<M, E>::new(extractor)));
    }

    /// Register an erased extractor under `type_id`. Last registration wins.
    pub fn register_extractor_for(
        &mut self,
        type_id: impl Into<String>,
        extractor: Arc<dyn ErasedExtractor>,
    ) {
        let type_id = type_id.into();
        if self.extractors.insert(type_id.clone(), extractor).is_some() {
            debug!(type_id = %type_id, "[dvs-02] replaced result extractor");
        }
    }

    pub fn has_extractor(&self, type_id: &str) -> bool {
        self.extractors.contains_key(type_id)
    }

    /// Wrap a handler outcome. Errors pass through untouched.
    ///
    /// Extractor failures leave the corresponding field empty.
    pub fn wrap_result(
        &self,
        ctx: &RequestContext,
        output: Result<AnyMessage, RouterError>,
    ) -> Result<DispatchResult, RouterError> {
        let output = output?;

        let mut result = DispatchResult {
            raw_bytes: output.value.clone(),
            log: String::new(),
            events: ctx.event_log().events(),
            packed_response: None,
            custom_data: None,
            custom_digest: None,
        };

        if let Some(extractor) = self.extractors.get(output.type_id()) {
            result.custom_data = extractor
                .get_data(&output)
                .inspect_err(|e| {
                    warn!(type_id = %output.type_id(), error = %e, "[dvs-02] extractor get_data failed")
                })
                .ok();
            result.custom_digest = extractor
                .get_digest(&output)
                .inspect_err(|e| {
                    warn!(type_id = %output.type_id(), error = %e, "[dvs-02] extractor get_digest failed")
                })
                .ok();
        }

        result.packed_response = Some(output);
        Ok(result)
    }

    /// Typed form of [`wrap_result`](Self::wrap_result).
    pub fn wrap<M: DomainMessage>(
        &self,
        ctx: &RequestContext,
        output: Result<M, RouterError>,
    ) -> Result<DispatchResult, RouterError> {
        self.wrap_result(ctx, output.map(|msg| msg.to_any()))
    }
}

impl fmt::Debug for ResultPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.extractors.keys().collect();
        types.sort();
        f.debug_struct("ResultPipeline")
            .field("extractors", &types)
            .finish()
    }
}
