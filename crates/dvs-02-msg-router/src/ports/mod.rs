//! # Ports Layer
//!
//! - **Inbound (Driving)**: `MessageRouter`, what the node boundary dispatches
//!   through.

pub mod inbound;
