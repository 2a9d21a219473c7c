//! Engine instance cache.
//!
//! Memoizes [`RedirectEngine`] instances by the structural content of their
//! inputs. The cache is an explicit object owned by the application; scope it
//! to whatever lifetime should bound its growth, since entries are never
//! evicted on their own.

use std::sync::Arc;

use dashmap::DashMap;

use crate::engine::options::RedirectOptions;
use crate::engine::orchestrator::RedirectEngine;
use crate::http::request::RedirectRequest;
use crate::rules::RedirectRule;

/// Structural identity of an engine's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    request: RedirectRequest,
    rules: Arc<[RedirectRule]>,
    options: RedirectOptions,
}

/// Thread-safe read-through cache of engines.
#[derive(Debug, Clone, Default)]
pub struct EngineCache {
    inner: Arc<DashMap<CacheKey, Arc<RedirectEngine>>>,
}

impl EngineCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the engine for these inputs, constructing it on first use.
    pub fn factory(
        &self,
        request: RedirectRequest,
        rules: impl Into<Arc<[RedirectRule]>>,
        options: RedirectOptions,
    ) -> Arc<RedirectEngine> {
        let key = CacheKey {
            request,
            rules: rules.into(),
            options,
        };

        if let Some(engine) = self.inner.get(&key) {
            return engine.value().clone();
        }

        self.inner
            .entry(key.clone())
            .or_insert_with(|| {
                tracing::trace!(url = %key.request.url(), "Engine cache miss");
                Arc::new(RedirectEngine::new(key.request, key.rules, key.options))
            })
            .value()
            .clone()
    }

    /// Number of cached engines.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every cached engine.
    pub fn clear(&self) {
        self.inner.clear();
    }
}
