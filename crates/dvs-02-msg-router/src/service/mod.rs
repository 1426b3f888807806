//! # Service Layer
//!
//! - `RouterBuilder`: registration
//! - `MsgRouter`: dispatch, implements `MessageRouter`
//! - `ResultPipeline`: output wrapping and extractors

pub mod builder;
pub mod pipeline;
pub mod router;

pub use builder::RouterBuilder;
pub use pipeline::{DispatchResult, ResultPipeline};
pub use router::MsgRouter;
