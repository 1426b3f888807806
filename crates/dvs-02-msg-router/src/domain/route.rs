//! # Routes
//!
//! A route binds one lookup key to one erased handler. The lookup key is
//! the request type identifier, suffixed for response-phase handlers so that
//! both phases can accept the same wire type without colliding.

use crate::domain::errors::{HandlerError, RouterError};
use futures::future::BoxFuture;
use futures::FutureExt;
use shared_types::{AnyMessage, RequestContext};
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Future returned by an erased handler.
pub type RouteFuture = BoxFuture<'static, Result<AnyMessage, RouterError>>;

/// Erased handler: decode the request, run the implementation, pack the
/// response.
pub type Invoke = dyn Fn(RequestContext, AnyMessage) -> RouteFuture + Send + Sync;

/// Round phase a handler serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Request,
    Response,
}

impl Phase {
    /// Phase selected by a context: response once a validated outcome is
    /// attached.
    pub fn of(ctx: &RequestContext) -> Self {
        if ctx.is_response_phase() {
            Self::Response
        } else {
            Self::Request
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => f.write_str("request"),
            Self::Response => f.write_str("response"),
        }
    }
}

/// Lookup key for `type_id` in `phase`.
pub fn lookup_key(type_id: &str, phase: Phase, response_suffix: &str) -> String {
    match phase {
        Phase::Request => type_id.to_string(),
        Phase::Response => format!("{type_id}{response_suffix}"),
    }
}

/// Registered handler.
#[derive(Clone)]
pub struct Route {
    pub(crate) key: String,
    pub(crate) type_id: &'static str,
    pub(crate) phase: Phase,
    pub(crate) service: &'static str,
    pub(crate) method: &'static str,
    pub(crate) invoke: Arc<Invoke>,
}

impl Route {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn type_id(&self) -> &'static str {
        self.type_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Run the handler. A panic inside it becomes `HandlerError::Panicked`.
    pub async fn call(&self, ctx: RequestContext, msg: AnyMessage) -> Result<AnyMessage, RouterError> {
        let invoke = Arc::clone(&self.invoke);
        match AssertUnwindSafe(async move { invoke(ctx, msg).await })
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => Err(HandlerError::Panicked {
                method: self.method,
                message: panic_message(payload.as_ref()),
            }
            .into()),
        }
    }

    pub fn info(&self) -> RouteInfo {
        RouteInfo {
            key: self.key.clone(),
            type_id: self.type_id,
            phase: self.phase,
            service: self.service,
            method: self.method,
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("key", &self.key)
            .field("service", &self.service)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Introspection view of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub key: String,
    pub type_id: &'static str,
    pub phase: Phase,
    pub service: &'static str,
    pub method: &'static str,
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
