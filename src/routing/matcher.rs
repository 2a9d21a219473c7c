//! Per-rule type handlers.
//!
//! # Responsibilities
//! - Define the matching strategy interface keyed by a rule's `type`
//! - Provide the built-in `path` strategy (pattern match + destination build)
//! - Hold the per-engine registry of strategies
//!
//! # Design Decisions
//! - Strategies are trait objects behind `Arc` so registries clone cheaply
//! - Any `Fn(&RedirectRule, &RedirectRequest) -> Option<RuleMatch>` closure
//!   is a strategy
//! - Bulk evaluation skips unknown types; explicit lookup reports them

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::error::RedirectError;
use crate::http::request::RedirectRequest;
use crate::routing::{destination, pattern};
use crate::rules::{RedirectRule, PATH_TYPE};

/// Outcome of a successful strategy match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Wildcard values captured from the request path, in order.
    pub captures: Vec<String>,
    /// Absolute redirect target.
    pub destination: Url,
}

/// Matching strategy for one rule type.
pub trait TypeHandler: Send + Sync {
    /// Returns the match for `request`, or `None` to move on to the next rule.
    fn matches(&self, rule: &RedirectRule, request: &RedirectRequest) -> Option<RuleMatch>;
}

impl<F> TypeHandler for F
where
    F: Fn(&RedirectRule, &RedirectRequest) -> Option<RuleMatch> + Send + Sync,
{
    fn matches(&self, rule: &RedirectRule, request: &RedirectRequest) -> Option<RuleMatch> {
        self(rule, request)
    }
}

/// The built-in `path` strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathHandler;

impl TypeHandler for PathHandler {
    fn matches(&self, rule: &RedirectRule, request: &RedirectRequest) -> Option<RuleMatch> {
        if rule.source.trim().is_empty() || rule.destination.trim().is_empty() {
            tracing::debug!(rule_id = %rule.id, "Rule without source or destination skipped");
            return None;
        }

        let captures = pattern::match_path(&rule.source, request.path())?;

        match destination::build(&rule.destination, request.url(), &captures) {
            Ok(destination) => Some(RuleMatch {
                captures,
                destination,
            }),
            Err(e) => {
                tracing::debug!(
                    rule_id = %rule.id,
                    destination = %rule.destination,
                    error = %e,
                    "Rule destination does not form a URL"
                );
                None
            }
        }
    }
}

/// Registry of strategies keyed by type name.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn TypeHandler>>,
}

impl HandlerRegistry {
    /// A registry holding only the built-in `path` strategy.
    pub fn new() -> Self {
        let mut handlers: HashMap<String, Arc<dyn TypeHandler>> = HashMap::new();
        handlers.insert(PATH_TYPE.to_string(), Arc::new(PathHandler));
        Self { handlers }
    }

    /// Add or replace the strategy for `type_name`.
    pub fn register(&mut self, type_name: impl Into<String>, handler: impl TypeHandler + 'static) {
        self.handlers.insert(type_name.into(), Arc::new(handler));
    }

    /// Explicit lookup; an unregistered type is an error.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<dyn TypeHandler>, RedirectError> {
        self.get(type_name)
            .cloned()
            .ok_or_else(|| RedirectError::UnknownType(type_name.to_string()))
    }

    /// Lookup used during bulk evaluation.
    pub fn get(&self, type_name: &str) -> Option<&Arc<dyn TypeHandler>> {
        self.handlers.get(type_name)
    }

    /// True when `type_name` has a strategy.
    pub fn contains(&self, type_name: &str) -> bool {
        self.handlers.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("types", &self.types())
            .finish()
    }
}
