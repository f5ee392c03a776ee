//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! proxy handler produces:
//!     → logging.rs (structured log events, request ID on every line)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (platform log collection)
//!     → Prometheus scrape (optional)
//! ```
//!
//! Upstream URLs are only ever logged in redacted form.

pub mod logging;
pub mod metrics;
