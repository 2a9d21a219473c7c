//! Rule-driven URL redirect engine.
//!
//! Given an incoming request, an ordered list of redirect rules and a few
//! switches, decide whether to redirect, where to, and with which status.

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod rules;

pub use config::schema::RedirectConfig;
pub use engine::{EngineCache, Hook, Redirect, RedirectDecision, RedirectEngine, RedirectOptions};
pub use error::RedirectError;
pub use http::{HttpServer, RedirectRequest};
pub use lifecycle::Shutdown;
pub use routing::matcher::{HandlerRegistry, RuleMatch, TypeHandler};
pub use rules::{RedirectRule, RuleId};
