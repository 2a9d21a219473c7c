//! End-to-end redirect decision.
//!
//! # Responsibilities
//! - Own one request, its rule set, options, hooks and type handlers
//! - Run switches → hooks → rule pipeline → scheme enforcement
//! - Produce exactly one [`RedirectDecision`] per pass
//!
//! # Design Decisions
//! - Processing is synchronous and never fails; misuse errors come only from
//!   the by-name accessors
//! - Hooks run on a copy of the request; the stored request is unchanged
//!   between passes
//! - A matched rule's destination is forced secure when `forcehttps` is set,
//!   even if the request already was

use std::sync::Arc;

use crate::engine::decision::{redirect_status, Redirect, RedirectDecision, DEFAULT_REDIRECT_STATUS};
use crate::engine::hooks::{Hook, HookRegistry};
use crate::engine::options::{OptionValue, RedirectOptions};
use crate::error::RedirectError;
use crate::http::request::{RedirectRequest, SECURE_SCHEME};
use crate::routing::destination::force_scheme_on;
use crate::routing::matcher::{HandlerRegistry, TypeHandler};
use crate::routing::router::Router;
use crate::rules::RedirectRule;

/// Redirect orchestrator for a single request.
#[derive(Debug, Clone)]
pub struct RedirectEngine {
    request: RedirectRequest,
    rules: Arc<[RedirectRule]>,
    options: RedirectOptions,
    handlers: HandlerRegistry,
    hooks: HookRegistry,
}

impl RedirectEngine {
    /// Create an engine with the built-in handlers and no hooks.
    pub fn new(
        request: RedirectRequest,
        rules: impl Into<Arc<[RedirectRule]>>,
        options: RedirectOptions,
    ) -> Self {
        Self::with_registries(
            request,
            rules,
            options,
            HandlerRegistry::new(),
            HookRegistry::new(),
        )
    }

    /// Create an engine with caller-prepared registries.
    pub fn with_registries(
        request: RedirectRequest,
        rules: impl Into<Arc<[RedirectRule]>>,
        options: RedirectOptions,
        handlers: HandlerRegistry,
        hooks: HookRegistry,
    ) -> Self {
        Self {
            request,
            rules: rules.into(),
            options,
            handlers,
            hooks,
        }
    }

    /// The request as built, before any hook ran.
    pub fn request(&self) -> &RedirectRequest {
        &self.request
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[RedirectRule] {
        &self.rules
    }

    /// Current option values.
    pub fn options(&self) -> &RedirectOptions {
        &self.options
    }

    /// Look an option up by name.
    pub fn option(&self, name: &str) -> Result<OptionValue, RedirectError> {
        self.options.get(name)
    }

    /// Whether insecure requests are sent to https.
    pub fn force_https(&self) -> bool {
        self.options.force_https
    }

    /// Turn https enforcement on or off.
    pub fn set_force_https(&mut self, force_https: bool) -> &mut Self {
        self.options.force_https = force_https;
        self
    }

    /// Enable or disable the engine; a disabled engine never redirects.
    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.options.enabled = enabled;
        self
    }

    /// Replace the paths that bypass every rule.
    pub fn set_excludes<I, S>(&mut self, excludes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }

    /// Explicit handler lookup; unregistered types are an error.
    pub fn type_handler(&self, type_name: &str) -> Result<Arc<dyn TypeHandler>, RedirectError> {
        self.handlers.resolve(type_name)
    }

    /// Add or replace the strategy for a rule type.
    pub fn set_type_handler(
        &mut self,
        type_name: impl Into<String>,
        handler: impl TypeHandler + 'static,
    ) -> &mut Self {
        self.handlers.register(type_name, handler);
        self
    }

    /// Registered type strategies.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Register a hook callback by name.
    pub fn set_hook<F>(&mut self, name: &str, callback: F) -> Result<&mut Self, RedirectError>
    where
        F: Fn(RedirectRequest) -> RedirectRequest + Send + Sync + 'static,
    {
        self.hooks.set_by_name(name, callback)?;
        Ok(self)
    }

    /// Every extension point a callback can be registered against.
    pub fn hooks_available(&self) -> &'static [Hook] {
        &Hook::ALL
    }

    /// Decide what to do with the request.
    pub fn process(&self) -> RedirectDecision {
        if let Some(reason) = Router::bypass(&self.options, &self.request) {
            tracing::debug!(?reason, path = %self.request.path(), "Redirect pass bypassed");
            return RedirectDecision::NoAction;
        }

        let request = self.hooks.run(Hook::PreRedirectFilter, self.request.clone());

        let router = Router::new(&self.rules, &self.handlers);
        if let Some(found) = router.first_match(&request) {
            let mut location = found.matched.destination;
            if self.options.force_https {
                force_scheme_on(&mut location, SECURE_SCHEME);
            }
            let status = redirect_status(found.rule.http_status, &found.rule.id);
            tracing::debug!(
                rule_id = %found.rule.id,
                status = status.as_u16(),
                location = %location,
                "Rule redirect"
            );
            return RedirectDecision::Rule(Redirect::new(status, location, Some(found.rule.id.clone())));
        }

        if self.options.force_https && !request.is_secure() {
            let mut location = request.url().clone();
            force_scheme_on(&mut location, SECURE_SCHEME);
            tracing::debug!(location = %location, "Scheme redirect");
            return RedirectDecision::Scheme(Redirect::new(DEFAULT_REDIRECT_STATUS, location, None));
        }

        RedirectDecision::NoAction
    }
}
