//! # Service and Method Descriptors
//!
//! A method descriptor states its request and response types up front, so
//! the router learns the lookup key from `Req::TYPE_ID` without ever
//! calling the handler. The descriptor also carries the typed binding that
//! turns a service implementation into an erased [`Invoke`].
//!
//! ```ignore
//! let service = ServiceDescriptor::new("dvs.PingService")
//!     .with_method(MethodDescriptor::unary(
//!         "Ping",
//!         |svc: Arc<PingServer>, ctx, req: Ping| async move { svc.ping(ctx, req).await },
//!     ))
//!     .with_method(MethodDescriptor::unary(
//!         "PingDVSResponseHandler",
//!         |svc: Arc<PingServer>, ctx, req: Ping| async move { svc.on_response(ctx, req).await },
//!     ));
//! ```

use crate::domain::errors::HandlerError;
use crate::domain::route::{Invoke, RouteFuture};
use shared_types::{AnyMessage, DomainMessage, RequestContext};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type Binder<S> = dyn Fn(Arc<S>) -> Arc<Invoke> + Send + Sync;

/// One method of a service.
pub struct MethodDescriptor<S> {
    name: &'static str,
    request_type: &'static str,
    response_type: &'static str,
    bind: Arc<Binder<S>>,
}

impl<S: Send + Sync + 'static> MethodDescriptor<S> {
    /// Describe a unary method taking `Req` and answering `Resp`.
    pub fn unary<Req, Resp, F, Fut>(name: &'static str, handler: F) -> Self
    where
        Req: DomainMessage,
        Resp: DomainMessage,
        F: Fn(Arc<S>, RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, HandlerError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let bind = move |service: Arc<S>| -> Arc<Invoke> {
            let handler = Arc::clone(&handler);
            Arc::new(move |ctx: RequestContext, msg: AnyMessage| -> RouteFuture {
                let handler = Arc::clone(&handler);
                let service = Arc::clone(&service);
                Box::pin(async move {
                    let request = msg.unpack::<Req>()?;
                    let response = handler(service, ctx, request).await?;
                    Ok(response.to_any())
                })
            })
        };

        Self {
            name,
            request_type: Req::TYPE_ID,
            response_type: Resp::TYPE_ID,
            bind: Arc::new(bind),
        }
    }
}

impl<S> MethodDescriptor<S> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn request_type(&self) -> &'static str {
        self.request_type
    }

    pub fn response_type(&self) -> &'static str {
        self.response_type
    }

    pub(crate) fn bind(&self, implementation: Arc<S>) -> Arc<Invoke> {
        (self.bind)(implementation)
    }
}

impl<S> Clone for MethodDescriptor<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            request_type: self.request_type,
            response_type: self.response_type,
            bind: Arc::clone(&self.bind),
        }
    }
}

impl<S> fmt::Debug for MethodDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("request_type", &self.request_type)
            .field("response_type", &self.response_type)
            .finish_non_exhaustive()
    }
}

/// A named group of methods served by one implementation type.
pub struct ServiceDescriptor<S> {
    name: &'static str,
    methods: Vec<MethodDescriptor<S>>,
}

impl<S> ServiceDescriptor<S> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodDescriptor<S>) -> Self {
        self.methods.push(method);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn methods(&self) -> &[MethodDescriptor<S>] {
        &self.methods
    }
}

impl<S> fmt::Debug for ServiceDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .finish()
    }
}
