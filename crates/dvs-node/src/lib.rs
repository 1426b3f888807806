//! # DVS Node
//!
//! Application boundary of the dispatch core.
//!
//! ## Flow
//!
//! ```text
//! caller ──► DvsNode::process_dvs_request ──► MessageRouter::dispatch
//!        ◄── ResponseProcessDvsRequest   ◄── DispatchResult / RouterError
//! ```
//!
//! Every call gets a fresh `RequestContext` and event log. Failures are
//! reported through [`avsi_info`] as a `(codespace, code, log)` triple:
//! registered errors keep their code, decode failures report `sdk/2`,
//! unknown messages `sdk/6`, panics `sdk/111`, and anything else
//! `undefined/1`.
//!
//! ## Usage
//!
//! ```ignore
//! let config = NodeConfig::from_env()?;
//! dvs_telemetry::init_tracing(&config.telemetry)?;
//!
//! let mut builder = config.router_builder();
//! builder.register_service(&square_service(), Arc::new(Squarer))?;
//! let node = DvsNode::new(config, builder.build())?;
//!
//! let resp = node.process_dvs_request(BaseContext::background(), req).await;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod errors;
pub mod indexing;
pub mod node;
pub mod types;

pub use config::NodeConfig;
pub use errors::{avsi_info, ProcessError};
pub use indexing::mark_events_to_index;
pub use node::DvsNode;
pub use types::{
    DvsRequest, RequestProcessDvsRequest, RequestProcessDvsResponse, ResponseInfo,
    ResponseProcessDvsRequest, ResponseProcessDvsResponse,
};
