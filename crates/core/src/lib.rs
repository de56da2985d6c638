//! Core types for the nashville event pipeline
//!
//! Domain types shared across all other crates: staged raw captures,
//! normalized events, listing filters and the settings loader.

mod constants;
mod event;
mod raw;
mod settings;

pub use constants::*;
pub use event::*;
pub use raw::*;
pub use settings::*;
