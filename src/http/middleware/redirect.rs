//! Redirect middleware.
//! Evaluates the live rule set for every request.

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::config::ListenerConfig;
use crate::engine::hooks::HookRegistry;
use crate::engine::options::RedirectOptions;
use crate::engine::orchestrator::RedirectEngine;
use crate::http::request::RedirectRequest;
use crate::http::response::decision_response;
use crate::observability::metrics;
use crate::routing::matcher::HandlerRegistry;
use crate::rules::RedirectRule;

/// Rules and options served together; swapped as one unit on reload.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub rules: Arc<[RedirectRule]>,
    pub options: RedirectOptions,
}

impl RuleSet {
    pub fn new(rules: impl Into<Arc<[RedirectRule]>>, options: RedirectOptions) -> Self {
        Self {
            rules: rules.into(),
            options,
        }
    }
}

/// State required by [`redirect_middleware`].
#[derive(Clone)]
pub struct RedirectState {
    ruleset: Arc<ArcSwap<RuleSet>>,
    listener: Arc<ListenerConfig>,
    handlers: HandlerRegistry,
    hooks: HookRegistry,
}

impl RedirectState {
    pub fn new(ruleset: RuleSet, listener: ListenerConfig) -> Self {
        metrics::record_rules_loaded(ruleset.rules.len());
        Self {
            ruleset: Arc::new(ArcSwap::from_pointee(ruleset)),
            listener: Arc::new(listener),
            handlers: HandlerRegistry::new(),
            hooks: HookRegistry::new(),
        }
    }

    /// Type handlers copied into every per-request engine.
    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Hooks copied into every per-request engine.
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    /// The rule set currently being served.
    pub fn current(&self) -> Arc<RuleSet> {
        self.ruleset.load_full()
    }

    /// Atomically replace the live rule set.
    pub fn replace(&self, ruleset: RuleSet) {
        metrics::record_rules_loaded(ruleset.rules.len());
        self.ruleset.store(Arc::new(ruleset));
    }

    /// Build the engine for one request against the live rule set.
    pub fn engine(&self, request: RedirectRequest) -> RedirectEngine {
        let current = self.ruleset.load();
        RedirectEngine::with_registries(
            request,
            current.rules.clone(),
            current.options.clone(),
            self.handlers.clone(),
            self.hooks.clone(),
        )
    }
}

pub async fn redirect_middleware(
    State(state): State<RedirectState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();

    // 1. Reconstruct the absolute request URL. Unusable requests pass through.
    let request = match RedirectRequest::from_http(&req, &state.listener) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(uri = %req.uri(), error = %e, "Request not redirectable");
            return next.run(req).await;
        }
    };

    // 2. Decide
    let decision = state.engine(request).process();
    metrics::record_decision(&decision, started);

    // 3. Emit the redirect or continue down the stack
    match decision_response(decision) {
        Some(response) => response,
        None => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RedirectRule;
    use url::Url;

    #[test]
    fn test_replace_swaps_rules() {
        let state = RedirectState::new(RuleSet::default(), ListenerConfig::default());
        assert!(state.current().rules.is_empty());

        state.replace(RuleSet::new(
            vec![RedirectRule::new("1", "/", "/root", 302)],
            RedirectOptions::default(),
        ));
        assert_eq!(state.current().rules.len(), 1);
    }

    #[test]
    fn test_engine_uses_state_registries() {
        let mut hooks = HookRegistry::new();
        hooks
            .set_by_name("pre_redirect_filter", |request: RedirectRequest| {
                let url = Url::parse("http://localhost/moved").unwrap();
                request.with_url(url)
            })
            .unwrap();
        let state = RedirectState::new(
            RuleSet::new(
                vec![RedirectRule::new("1", "/moved", "/target", 301)],
                RedirectOptions::default(),
            ),
            ListenerConfig::default(),
        )
        .with_hooks(hooks);

        let engine = state.engine(RedirectRequest::get("http://localhost/anything").unwrap());
        let decision = engine.process();
        assert_eq!(decision.location().unwrap().as_str(), "http://localhost/target");
    }
}
