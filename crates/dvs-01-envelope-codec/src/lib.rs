//! # Envelope Codec (DVS-01)
//!
//! Serializes batches of domain messages into a canonical binary envelope and
//! back.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): wire primitives, canonical pass,
//!   unknown-field pass, envelope types and builder
//! - **Ports Layer** (`ports/`): `MsgCodec`
//! - **Service Layer** (`service.rs`): `EnvelopeCodec`
//!
//! ## Canonical Form
//!
//! An envelope has three length-delimited fields at ascending numbers: body
//! (1), auth-info (2) and any number of signatures (3). Every length prefix
//! must be the shortest varint for its value. Bytes that break any of these
//! rules are rejected as `InvalidEncoding` before anything is unmarshalled,
//! so one logical envelope has exactly one accepted encoding.
//!
//! ## Unknown Fields
//!
//! | Sub-structure | Policy |
//! |---|---|
//! | wrapper | strict |
//! | auth-info | strict |
//! | body | non-critical (`n & 1024 != 0`) tolerated and flagged |

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::CodecConfig;
pub use domain::builder::EnvelopeBuilder;
pub use domain::canonical::reject_non_canonical;
pub use domain::envelope::{AuthInfo, Body, Coin, Envelope, EnvelopeRaw, Fee, SignerInfo};
pub use domain::errors::{CodecError, EncodingViolation};
pub use domain::unknown_fields::NON_CRITICAL_FIELD_BIT;
pub use domain::wire::{varint_min_length, WireError, WireType};
pub use ports::inbound::MsgCodec;
pub use service::EnvelopeCodec;
