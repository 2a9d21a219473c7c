//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks on listener/observability)
//!     → RedirectConfig (validated, immutable)
//!     → rules + options shared with the HTTP layer via ArcSwap
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps the live rule set atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Rule data is never rejected at load time

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{ListenerConfig, LogFormat, ObservabilityConfig, RedirectConfig};
