//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use redirect_engine::{RedirectEngine, RedirectOptions, RedirectRequest, RedirectRule};

/// An active `path` rule with status 302.
pub fn rule(source: &str, destination: &str) -> RedirectRule {
    RedirectRule::new("1", source, destination, 302)
}

pub fn request(url: &str) -> RedirectRequest {
    RedirectRequest::get(url).unwrap()
}

/// Options as shipped by default: enabled, no forcehttps, no excludes.
pub fn options() -> RedirectOptions {
    RedirectOptions::default()
}

pub fn engine(url: &str, rules: Vec<RedirectRule>) -> RedirectEngine {
    RedirectEngine::new(request(url), rules, options())
}

pub fn engine_with(url: &str, rules: Vec<RedirectRule>, options: RedirectOptions) -> RedirectEngine {
    RedirectEngine::new(request(url), rules, options)
}

/// `(status, location)` of a processing pass, `None`s for no action.
pub fn outcome(engine: &RedirectEngine) -> (Option<u16>, Option<String>) {
    let decision = engine.process();
    (
        decision.status().map(|s| s.as_u16()),
        decision.location().map(|l| l.to_string()),
    )
}

/// Send a raw HTTP/1.1 request and return the full response text.
pub async fn raw_request(addr: SocketAddr, path: &str, host: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, host
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}
