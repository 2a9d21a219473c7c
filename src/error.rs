//! Errors surfaced by the engine's explicit accessors.
//!
//! Normal processing never fails: a rule that does not match, or whose type
//! has no handler, is skipped. These errors only come back from by-name
//! lookups and registrations made directly by the caller.

use thiserror::Error;

/// Misuse of a by-name accessor or setter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedirectError {
    /// The option name is not one of the recognized keys.
    #[error("no such option: {0}")]
    UnknownOption(String),

    /// No type handler is registered under this name.
    #[error("no type handler registered for type: {0}")]
    UnknownType(String),

    /// The hook name is not one of the defined extension points.
    #[error("no such hook: {0}")]
    UnknownHook(String),
}
