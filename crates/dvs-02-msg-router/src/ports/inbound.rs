//! # Inbound Ports
//!
//! Router API consumed by the node boundary.

use crate::domain::errors::RouterError;
use crate::domain::route::RouteInfo;
use crate::service::pipeline::DispatchResult;
use async_trait::async_trait;
use shared_types::RequestContext;

/// Dispatch entry point.
///
/// Implementations must be safe to call concurrently; each call gets its own
/// context.
#[async_trait]
pub trait MessageRouter: Send + Sync {
    /// Decode `raw` and dispatch its first routable message.
    async fn dispatch(
        &self,
        ctx: RequestContext,
        raw: &[u8],
    ) -> Result<DispatchResult, RouterError>;

    /// Registered routes.
    fn routes(&self) -> Vec<RouteInfo>;
}
