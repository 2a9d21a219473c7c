//! Rule matching subsystem.
//!
//! # Data Flow
//! ```text
//! RedirectRequest (scheme, host, port, path, query)
//!     → router.rs (enabled / excludes switches, ordered rule walk)
//!     → matcher.rs (type handler lookup by rule `type`)
//!     → pattern.rs (source pattern vs request path, wildcard captures)
//!     → destination.rs (template expansion, origin inheritance, query merge)
//!     → Return: matched rule + absolute destination, or no match
//! ```
//!
//! # Design Decisions
//! - Rules are evaluated in the order supplied; first match wins
//! - No regex in the hot path (segment-wise wildcard matching only)
//! - Deterministic: same input always matches the same rule
//! - Non-matching and malformed rules are control flow, never errors

pub mod destination;
pub mod matcher;
pub mod pattern;
pub mod router;

pub use matcher::{HandlerRegistry, PathHandler, RuleMatch, TypeHandler};
pub use router::{Bypass, Matched, Router};
