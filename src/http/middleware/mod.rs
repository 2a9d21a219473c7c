//! Tower/axum middleware.

pub mod redirect;

pub use redirect::{redirect_middleware, RedirectState, RuleSet};
