// Response envelope and the service facade built on it
mod response;
mod service;

pub use response::ApiResponse;
pub use service::{FETCH_FAILED, ListingService, NOT_FOUND, SERVER_RUNNING, STATE_UPDATED};
