//! Response emission.
//!
//! # Responsibilities
//! - Turn a redirect into an HTTP response (status, `Location`, anti-cache headers)
//!
//! # Design Decisions
//! - `NoAction` never becomes a response; the caller passes the request on
//! - Empty body; clients follow `Location`

use axum::body::Body;
use axum::response::{IntoResponse, Response};

use crate::engine::decision::{Redirect, RedirectDecision};

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        (self.status, self.headers(), Body::empty()).into_response()
    }
}

/// The response for `decision`, or `None` when the request should continue.
pub fn decision_response(decision: RedirectDecision) -> Option<Response> {
    match decision {
        RedirectDecision::NoAction => None,
        RedirectDecision::Rule(redirect) | RedirectDecision::Scheme(redirect) => {
            Some(redirect.into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use url::Url;

    #[test]
    fn test_redirect_response() {
        let redirect = Redirect::new(
            StatusCode::MOVED_PERMANENTLY,
            Url::parse("https://example.com/new?a=1").unwrap(),
            None,
        );
        let response = decision_response(RedirectDecision::Scheme(redirect)).unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        let headers = response.headers();
        assert_eq!(headers[header::LOCATION], "https://example.com/new?a=1");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store,no-cache");
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert!(headers.contains_key(header::EXPIRES));
    }

    #[test]
    fn test_no_action_has_no_response() {
        assert!(decision_response(RedirectDecision::NoAction).is_none());
    }
}
