//! Normalization rules for staged raw captures.
//!
//! Everything here is pure: a [`RawRecord`](nashville_core::RawRecord) goes in,
//! a [`NewEvent`](nashville_core::NewEvent) or a [`SkipReason`] comes out.

mod categorizer;
mod sources;
mod standardizer;
mod text;

pub use categorizer::{categorize_event, detect_genre};
pub use sources::{SkipReason, TRUSTED_SPIDERS, display_source, normalize_record};
pub use standardizer::{
    standardize_date, standardize_date_in_year, standardize_price, standardize_venue_name,
};
pub use text::title_case;
