//! Neople API proxy library.
//!
//! Forwards browser GETs to the Neople game-data API with the server-held API
//! key injected, and answers CORS preflights locally.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::{ApiKey, ProxyConfig};
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
