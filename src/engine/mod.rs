//! Redirect decision subsystem.
//!
//! # Data Flow
//! ```text
//! RedirectRequest + Arc<[RedirectRule]> + RedirectOptions
//!     → cache.rs (optional: reuse an engine built from equal inputs)
//!     → orchestrator.rs
//!         → options.rs (enabled / excludes switches)
//!         → hooks.rs (pre_redirect_filter may replace the request)
//!         → routing (first matching rule + destination)
//!         → scheme enforcement (forcehttps)
//!     → decision.rs: NoAction | Rule(Redirect) | Scheme(Redirect)
//! ```
//!
//! # Design Decisions
//! - One engine per request; registries are per engine and clone cheaply
//! - Every redirect carries anti-cache headers with an expiry in the past
//! - The instance cache is injected, never a hidden global

pub mod cache;
pub mod decision;
pub mod hooks;
pub mod options;
pub mod orchestrator;

pub use cache::EngineCache;
pub use decision::{Redirect, RedirectDecision, DEFAULT_REDIRECT_STATUS};
pub use hooks::{Hook, HookRegistry};
pub use options::{OptionValue, RedirectOptions};
pub use orchestrator::RedirectEngine;
