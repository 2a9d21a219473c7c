//! HTTP boundary subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout + trace layers)
//!     → middleware/redirect.rs
//!         → request.rs (absolute URL from URI, Host, X-Forwarded-Proto)
//!         → engine (decision)
//!         → response.rs (3xx + Location + anti-cache headers)
//!     → otherwise the inner service (404 fallback)
//! ```
//!
//! # Design Decisions
//! - The engine never sees axum types; `RedirectRequest` is the only input
//! - Rule sets are swapped atomically, in-flight requests keep the old set

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{redirect_middleware, RedirectState, RuleSet};
pub use request::{RedirectRequest, RequestError};
pub use response::decision_response;
pub use server::HttpServer;
