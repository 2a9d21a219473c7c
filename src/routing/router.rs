//! Ordered rule evaluation.
//!
//! # Responsibilities
//! - Short-circuit the whole pass when disabled or the path is excluded
//! - Walk rules in the order supplied, filtering inactive and untyped rules
//! - Return the first rule whose strategy matches
//!
//! # Design Decisions
//! - First match wins; later rules are never evaluated
//! - A rejected rule is a debug event, not an error
//! - Borrows rules and registry; holds no state of its own

use crate::engine::options::RedirectOptions;
use crate::http::request::RedirectRequest;
use crate::routing::matcher::{HandlerRegistry, RuleMatch};
use crate::routing::pattern::normalize_path;
use crate::rules::RedirectRule;

/// Why a pass was skipped before any rule was inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bypass {
    Disabled,
    Excluded,
}

/// The winning rule and its match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched<'r> {
    pub rule: &'r RedirectRule,
    pub matched: RuleMatch,
}

/// Filter pipeline over one rule set.
#[derive(Debug, Clone, Copy)]
pub struct Router<'a> {
    rules: &'a [RedirectRule],
    handlers: &'a HandlerRegistry,
}

impl<'a> Router<'a> {
    pub fn new(rules: &'a [RedirectRule], handlers: &'a HandlerRegistry) -> Self {
        Self { rules, handlers }
    }

    /// Check the pass-wide switches.
    pub fn bypass(options: &RedirectOptions, request: &RedirectRequest) -> Option<Bypass> {
        if !options.enabled {
            return Some(Bypass::Disabled);
        }
        if options.is_excluded(request.path()) {
            return Some(Bypass::Excluded);
        }
        None
    }

    /// Find the first rule that matches `request`.
    pub fn first_match(&self, request: &RedirectRequest) -> Option<Matched<'a>> {
        let path = normalize_path(request.path());

        for rule in self.rules {
            if !rule.active {
                tracing::debug!(rule_id = %rule.id, "Skipping inactive rule");
                continue;
            }

            let Some(handler) = self.handlers.get(&rule.rule_type) else {
                tracing::debug!(rule_id = %rule.id, rule_type = %rule.rule_type, "Skipping rule with unregistered type");
                continue;
            };

            match handler.matches(rule, request) {
                Some(matched) => {
                    tracing::debug!(
                        rule_id = %rule.id,
                        path = %path,
                        destination = %matched.destination,
                        "Rule matched"
                    );
                    return Some(Matched { rule, matched });
                }
                None => continue,
            }
        }

        None
    }
}
