//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the default scheme
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectConfig → Result<(), Vec<ValidationError>>
//! - Rule records are deliberately not validated; a malformed rule never
//!   matches at runtime instead

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RedirectConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("listener.default_scheme '{0}' must be http or https")]
    DefaultScheme(String),

    #[error("listener.request_timeout_secs must be greater than zero")]
    RequestTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check a parsed configuration.
pub fn validate_config(config: &RedirectConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if !matches!(config.listener.default_scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::DefaultScheme(config.listener.default_scheme.clone()));
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
