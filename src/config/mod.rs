//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!
//! NEOPLE_API_KEY (environment)
//!     → secret.rs (ApiKey, read once at startup)
//! ```
//!
//! Both values are built before the listener binds and handed to the server
//! explicitly; handlers never read the environment.

pub mod loader;
pub mod schema;
pub mod secret;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, ProxyConfig, TimeoutConfig, UpstreamConfig};
pub use secret::{ApiKey, API_KEY_ENV};
