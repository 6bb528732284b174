//! Utility modules: developer log capture, JSON/BSON conversion, lenient numeric parsing.
pub mod devlog;
pub mod json;
pub mod num;
