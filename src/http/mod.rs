//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (method branches: preflight / 405 / forward)
//!     → request.rs (mount prefix stripped, upstream URL built, key injected)
//!     → reqwest GET to the Neople API
//!     → response.rs (status, content-type and JSON body relayed)
//!     → CORS origin header stamped by the router
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{upstream_path, UpstreamUrl};
pub use server::{build_router, AppState, HttpServer};
