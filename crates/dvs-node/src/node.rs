//! # DVS Node
//!
//! The application boundary. Each process call builds a fresh request
//! context (with its own event log), dispatches the request data through
//! the router and reports either the dispatch result or a coded error.
//!
//! ```text
//! RequestProcessDvsRequest ──► context(chain, height, groups, operators)
//!                          ──► router.dispatch(request.data)
//!                          ──► ResponseProcessDvsRequest { response, response_digest }
//!
//! RequestProcessDvsResponse ─► context(.., validated_response)
//!                           ─► router.dispatch(dvs_request.data)   (response phase)
//!                           ─► ResponseProcessDvsResponse { data }
//! ```

use crate::config::NodeConfig;
use crate::errors::{avsi_info, ProcessError};
use crate::indexing::mark_events_to_index;
use crate::types::{
    DvsRequest, RequestProcessDvsRequest, RequestProcessDvsResponse, ResponseInfo,
    ResponseProcessDvsRequest, ResponseProcessDvsResponse,
};
use dvs_02_msg_router::{MessageRouter, RouteInfo};
use dvs_telemetry::log_event;
use shared_types::{BaseContext, ConfigError, EventLog, RequestContext};
use std::collections::HashSet;
use std::sync::Arc;

/// Dispatching node.
pub struct DvsNode {
    config: NodeConfig,
    router: Arc<dyn MessageRouter>,
    index_set: HashSet<String>,
}

impl DvsNode {
    pub fn new(config: NodeConfig, router: impl MessageRouter + 'static) -> Result<Self, ConfigError> {
        config.validate()?;
        let index_set = config.index_set();
        log_event!(
            info,
            "dvs-node",
            "node ready",
            name = %config.name,
            routes = router.routes().len()
        );
        Ok(Self {
            config,
            router: Arc::new(router),
            index_set,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn info(&self) -> ResponseInfo {
        ResponseInfo {
            name: self.config.name.clone(),
            version: self.config.version.clone(),
        }
    }

    pub fn routes(&self) -> Vec<RouteInfo> {
        self.router.routes()
    }

    /// Request phase.
    pub async fn process_dvs_request(
        &self,
        base: BaseContext,
        req: RequestProcessDvsRequest,
    ) -> Result<ResponseProcessDvsRequest, ProcessError<ResponseProcessDvsRequest>> {
        let span = tracing::info_span!(
            "process_dvs_request",
            chain_id = req.request.chain_id,
            height = req.request.height
        );
        let ctx = request_context(base, &req.request)
            .with_operators(req.operators)
            .with_span(span);

        match self.router.dispatch(ctx, &req.request.data).await {
            Ok(res) => Ok(ResponseProcessDvsRequest {
                log: res.log,
                events: mark_events_to_index(res.events, &self.index_set),
                response: res.custom_data.unwrap_or_default(),
                response_digest: res.custom_digest.unwrap_or_default(),
                ..ResponseProcessDvsRequest::default()
            }),
            Err(err) => {
                log_event!(error, "dvs-node", "process request error", error = %err);
                let (codespace, code, log) = avsi_info(Some(&err), self.config.trace);
                Err(ProcessError {
                    response: ResponseProcessDvsRequest {
                        code,
                        log,
                        codespace: codespace.to_string(),
                        ..ResponseProcessDvsRequest::default()
                    },
                    source: err,
                })
            }
        }
    }

    /// Response phase: the validated outcome of the round routes the same
    /// request data to its response handler.
    pub async fn process_dvs_response(
        &self,
        base: BaseContext,
        req: RequestProcessDvsResponse,
    ) -> Result<ResponseProcessDvsResponse, ProcessError<ResponseProcessDvsResponse>> {
        let span = tracing::info_span!(
            "process_dvs_response",
            chain_id = req.dvs_request.chain_id,
            height = req.dvs_request.height
        );
        let ctx = request_context(base, &req.dvs_request)
            .with_validated_response(Some(req.dvs_response))
            .with_span(span);

        match self.router.dispatch(ctx, &req.dvs_request.data).await {
            Ok(res) => Ok(ResponseProcessDvsResponse {
                log: res.log,
                events: mark_events_to_index(res.events, &self.index_set),
                data: res.custom_data.unwrap_or_default(),
                ..ResponseProcessDvsResponse::default()
            }),
            Err(err) => {
                log_event!(error, "dvs-node", "process response error", error = %err);
                let (codespace, code, log) = avsi_info(Some(&err), self.config.trace);
                Err(ProcessError {
                    response: ResponseProcessDvsResponse {
                        code,
                        log,
                        codespace: codespace.to_string(),
                        ..ResponseProcessDvsResponse::default()
                    },
                    source: err,
                })
            }
        }
    }
}

impl std::fmt::Debug for DvsNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DvsNode")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Fresh context for one top-level call.
fn request_context(base: BaseContext, request: &DvsRequest) -> RequestContext {
    RequestContext::new(base, EventLog::new())
        .with_chain_id(request.chain_id)
        .with_height(request.height)
        .with_group_numbers(request.group_numbers.clone())
        .with_group_threshold_percentages(request.group_threshold_percentages.clone())
        .with_request_payload(request.data.clone())
}
