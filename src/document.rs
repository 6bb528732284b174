//! Typed read access over a stored listing document.

pub mod fields;
mod view;

pub use view::{Listing, PrimaryFeature, ReviewState};
