//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → server stops accepting → reload task exits → drain
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task subscribes
//! - Draining is bounded by `shutdown_timeout_secs`

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
