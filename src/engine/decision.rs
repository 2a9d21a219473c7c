//! Terminal output of a processing pass.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use chrono::{DateTime, Duration, Utc};
use url::Url;

use crate::rules::RuleId;

/// Status used for scheme-only redirects, and for rules whose status is not a redirect.
pub const DEFAULT_REDIRECT_STATUS: StatusCode = StatusCode::FOUND;

/// `Cache-Control` value carried by every redirect.
pub const CACHE_CONTROL_NO_STORE: &str = "no-store,no-cache";

/// `Pragma` value carried by every redirect.
pub const PRAGMA_NO_CACHE: &str = "no-cache";

/// What the surrounding pipeline should do with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Pass the request on untouched.
    NoAction,
    /// A rule matched.
    Rule(Redirect),
    /// No rule matched but the request must move to the secure scheme.
    Scheme(Redirect),
}

impl RedirectDecision {
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            RedirectDecision::NoAction => None,
            RedirectDecision::Rule(redirect) | RedirectDecision::Scheme(redirect) => Some(redirect),
        }
    }

    pub fn is_redirect(&self) -> bool {
        self.redirect().is_some()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.redirect().map(|r| r.status)
    }

    pub fn location(&self) -> Option<&Url> {
        self.redirect().map(|r| &r.location)
    }

    /// Metrics/log label.
    pub fn outcome(&self) -> &'static str {
        match self {
            RedirectDecision::NoAction => "none",
            RedirectDecision::Rule(_) => "rule",
            RedirectDecision::Scheme(_) => "scheme",
        }
    }
}

/// A fully formed redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub status: StatusCode,
    pub location: Url,
    /// Rule that produced the redirect; `None` for scheme-only redirects.
    pub rule_id: Option<RuleId>,
    /// Always in the past so no intermediary caches the target.
    pub expires: DateTime<Utc>,
}

impl Redirect {
    pub fn new(status: StatusCode, location: Url, rule_id: Option<RuleId>) -> Self {
        Self {
            status,
            location,
            rule_id,
            expires: Utc::now() - Duration::days(1),
        }
    }

    /// `Location` plus the anti-cache headers.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(location) = HeaderValue::from_str(self.location.as_str()) {
            headers.insert(header::LOCATION, location);
        }
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_NO_STORE));
        headers.insert(header::PRAGMA, HeaderValue::from_static(PRAGMA_NO_CACHE));
        if let Ok(expires) = HeaderValue::from_str(&http_date(&self.expires)) {
            headers.insert(header::EXPIRES, expires);
        }
        headers
    }
}

/// IMF-fixdate, the `Expires` header format.
pub fn http_date(at: &DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Resolve a rule's configured status.
///
/// Anything outside 3xx cannot carry a `Location` meaningfully and falls back
/// to [`DEFAULT_REDIRECT_STATUS`].
pub fn redirect_status(code: u16, rule_id: &RuleId) -> StatusCode {
    match StatusCode::from_u16(code) {
        Ok(status) if status.is_redirection() => status,
        _ => {
            tracing::warn!(%rule_id, http_status = code, "Rule status is not a redirect, using 302");
            DEFAULT_REDIRECT_STATUS
        }
    }
}
