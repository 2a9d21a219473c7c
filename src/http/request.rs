//! Request extraction.
//!
//! # Responsibilities
//! - Reconstruct the absolute URL of an inbound request (scheme, host, port,
//!   path, query) from the request target and its headers
//! - Expose the fields the engine matches on
//!
//! # Design Decisions
//! - `X-Forwarded-Proto` is honoured only when the listener trusts it
//! - A request without any usable host is not redirectable; the caller
//!   passes it through untouched

use axum::http::{header, Method, Request};
use thiserror::Error;
use url::Url;

use crate::config::ListenerConfig;

/// Scheme a forced-secure redirect switches to.
pub const SECURE_SCHEME: &str = "https";

/// Header set by TLS-terminating proxies in front of the engine.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Failure to turn an HTTP request into a [`RedirectRequest`].
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request has no host")]
    MissingHost,

    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The in-flight request as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RedirectRequest {
    method: Method,
    url: Url,
}

impl RedirectRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url }
    }

    /// Parse an absolute URL into a request.
    pub fn parse(method: Method, url: &str) -> Result<Self, RequestError> {
        Ok(Self::new(method, Url::parse(url)?))
    }

    /// Shorthand for a `GET` of `url`.
    pub fn get(url: &str) -> Result<Self, RequestError> {
        Self::parse(Method::GET, url)
    }

    /// Build from an inbound HTTP request.
    pub fn from_http<B>(req: &Request<B>, listener: &ListenerConfig) -> Result<Self, RequestError> {
        let scheme = forwarded_proto(req, listener)
            .or_else(|| req.uri().scheme_str().map(str::to_ascii_lowercase))
            .unwrap_or_else(|| listener.default_scheme.clone());

        let host = req
            .uri()
            .authority()
            .map(|a| a.as_str().to_string())
            .or_else(|| {
                req.headers()
                    .get(header::HOST)
                    .and_then(|h| h.to_str().ok())
                    .map(str::to_string)
            })
            .filter(|h| !h.is_empty())
            .ok_or(RequestError::MissingHost)?;

        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        let url = Url::parse(&format!("{}://{}{}", scheme, host, path_and_query))?;
        Ok(Self::new(req.method().clone(), url))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// True when the request already arrived over the secure scheme.
    pub fn is_secure(&self) -> bool {
        self.url.scheme() == SECURE_SCHEME
    }

    /// Replace the URL, keeping the method.
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = url;
        self
    }
}

fn forwarded_proto<B>(req: &Request<B>, listener: &ListenerConfig) -> Option<String> {
    if !listener.trust_forwarded_proto {
        return None;
    }
    req.headers()
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
}
