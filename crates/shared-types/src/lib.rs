//! # Shared Types Crate
//!
//! Types shared by the envelope codec, the message router and the node
//! boundary.
//!
//! ## Design Principles
//!
//! - **Typed messages, tagged on the wire**: every domain message names its
//!   schema through `DomainMessage::TYPE_ID`; `AnyMessage` carries it.
//! - **Value contexts**: `RequestContext` is rebuilt, never mutated in place.
//! - **Explicit event-log ownership**: a context records into the log it
//!   was constructed with.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod context;
pub mod entities;
pub mod errors;
pub mod events;
pub mod message;
pub mod store;

pub use context::{BaseContext, CancelHandle, RequestContext};
pub use entities::{NonSignerStakeIndices, Operator, ValidatedResponse};
pub use errors::{find_coded, CodedError, ConfigError};
pub use events::{Event, EventAttribute, EventLog};
pub use message::{AnyMessage, DomainMessage, MessageError};
pub use store::{KvStore, MemStore, StoreError};
