//! Named extension points.
//!
//! A hook receives the in-flight request and returns the request to use for
//! the rest of the pass. Hooks transform; they never reject.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::RedirectError;
use crate::http::request::RedirectRequest;

/// Extension points invoked during a processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Runs once per pass, before any rule is evaluated.
    PreRedirectFilter,
}

impl Hook {
    pub const ALL: [Hook; 1] = [Hook::PreRedirectFilter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::PreRedirectFilter => "pre_redirect_filter",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hook {
    type Err = RedirectError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Hook::ALL
            .into_iter()
            .find(|hook| hook.as_str() == name)
            .ok_or_else(|| RedirectError::UnknownHook(name.to_string()))
    }
}

/// Callback registered against a [`Hook`].
pub type HookFn = Arc<dyn Fn(RedirectRequest) -> RedirectRequest + Send + Sync>;

/// At most one callback per hook.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<Hook, HookFn>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`, replacing any previous one for `hook`.
    pub fn set<F>(&mut self, hook: Hook, callback: F)
    where
        F: Fn(RedirectRequest) -> RedirectRequest + Send + Sync + 'static,
    {
        self.hooks.insert(hook, Arc::new(callback));
    }

    /// Register by hook name.
    pub fn set_by_name<F>(&mut self, name: &str, callback: F) -> Result<(), RedirectError>
    where
        F: Fn(RedirectRequest) -> RedirectRequest + Send + Sync + 'static,
    {
        let hook = name.parse()?;
        self.set(hook, callback);
        Ok(())
    }

    pub fn is_set(&self, hook: Hook) -> bool {
        self.hooks.contains_key(&hook)
    }

    /// Invoke the callback for `hook`, or hand the request back unchanged.
    pub fn run(&self, hook: Hook, request: RedirectRequest) -> RedirectRequest {
        match self.hooks.get(&hook) {
            Some(callback) => {
                tracing::trace!(%hook, "Running hook");
                callback(request)
            }
            None => request,
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<&'static str> = Hook::ALL
            .iter()
            .filter(|hook| self.is_set(**hook))
            .map(Hook::as_str)
            .collect();
        f.debug_struct("HookRegistry").field("set", &set).finish()
    }
}
