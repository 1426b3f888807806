//! # DVS Dispatch Test Suite
//!
//! Unified test crate for behaviour that spans crates.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs        # Ping service, extractor, envelope helpers
//! │   └── integration/
//! │       ├── scenarios.rs   # End-to-end dispatch scenarios
//! │       ├── routing.rs     # Determinism, concurrency, duplicates
//! │       ├── results.rs     # Result fidelity and extractor opt-in
//! │       ├── node_flows.rs  # DvsNode request/response rounds
//! │       └── codec_properties.rs
//! └── benches/
//!     └── dispatch_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dvs-tests
//! cargo test -p dvs-tests integration::routing
//! cargo bench -p dvs-tests
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod fixtures;
