//! Query service for rental listings ("affito" documents).
//!
//! Caller filter options compile into a store-agnostic [`query::QueryExpression`]
//! plus an optional post-filter ([`filter::build`]); a [`store::ListingStore`]
//! executes the expression and [`filter::refine`] applies the post-filter.
//! Review-state changes go through [`gate::StateGate`], which checks identity,
//! the requested state and the caller's authority before a single-document
//! update. [`api::ListingService`] wraps both flows in the response envelope.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod cors;
pub mod document;
pub mod errors;
pub mod filter;
pub mod gate;
pub mod logger;
pub mod query;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use api::{ApiResponse, ListingService};
pub use errors::ApiError;
