//! # Message Router (DVS-02)
//!
//! Binds domain message types to handlers and dispatches decoded envelopes
//! to them, in the request phase or the response phase of a round.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): routes, descriptors, extractors, errors
//! - **Ports Layer** (`ports/`): `MessageRouter`
//! - **Service Layer** (`service/`): `RouterBuilder` (registration),
//!   `MsgRouter` (dispatch), `ResultPipeline` (output wrapping)
//!
//! ## Phases
//!
//! A context without a validated response dispatches in the request phase
//! and looks up the bare type identifier. Once a validated response is
//! attached, the same message type resolves to `"<type_id>#response"`, the
//! key under which methods named with the response marker are registered.
//!
//! ## Usage
//!
//! ```ignore
//! let mut builder = RouterBuilder::new(RouterConfig::default());
//! builder.register_service(&ping_service(), Arc::new(PingServer::default()))?;
//! builder.register_extractor::<Pong, _>(PongDigest);
//! let router = builder.build();
//!
//! let result = router.dispatch(RequestContext::background(), &raw).await?;
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::RouterConfig;
pub use domain::descriptor::{MethodDescriptor, ServiceDescriptor};
pub use domain::errors::{ExtractorError, HandlerError, RouterError};
pub use domain::extractor::{ErasedExtractor, ResultExtractor};
pub use domain::route::{lookup_key, Phase, Route, RouteInfo};
pub use ports::inbound::MessageRouter;
pub use service::{DispatchResult, MsgRouter, ResultPipeline, RouterBuilder};
