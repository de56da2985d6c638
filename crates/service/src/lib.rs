//! Service layer for the nashville pipeline
//!
//! Centralizes pipeline logic between the HTTP/CLI surfaces and storage.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::arithmetic_side_effects, reason = "Report counters are bounded by row counts")]

mod error;
mod event_service;
mod ingest_service;
mod normalize_service;

#[cfg(test)]
mod memory_store;

pub use error::ServiceError;
pub use event_service::EventService;
pub use ingest_service::IngestService;
pub use normalize_service::{NormalizeReport, NormalizeService};
