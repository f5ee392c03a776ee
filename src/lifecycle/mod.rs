//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Read API key → Build server → Bind listener
//!
//! Shutdown:
//!     Signal received (signals.rs) → Shutdown::trigger (shutdown.rs)
//!     → server stops accepting → in-flight requests drain → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::spawn_signal_handler;
