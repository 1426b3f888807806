//! # Ports Layer
//!
//! - **Inbound (Driving)**: `MsgCodec`, the API the router decodes through.

pub mod inbound;
