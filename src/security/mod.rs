//! Browser-facing security headers.

pub mod headers;

pub use headers::{allow_any_origin, preflight_response};
