//! # Domain Layer
//!
//! Routes, descriptors, extractors and errors. No I/O.

pub mod descriptor;
pub mod errors;
pub mod extractor;
pub mod route;
