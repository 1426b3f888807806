//! # Domain Layer
//!
//! Wire framing, canonical-form and unknown-field checks, and the envelope
//! types themselves. No I/O.

pub mod builder;
pub mod canonical;
pub mod envelope;
pub mod errors;
pub mod unknown_fields;
pub mod wire;
