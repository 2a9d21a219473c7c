//! Redirect rule definitions.
//!
//! # Data Flow
//! ```text
//! config file / caller-supplied records
//!     → serde (lenient field decoding)
//!     → RedirectRule (immutable)
//!     → shared as Arc<[RedirectRule]> with every engine built for a request
//! ```
//!
//! # Design Decisions
//! - Rules are not validated beyond what matching needs; a malformed rule
//!   simply never matches
//! - `id` may be a string or an integer, `active` may be a bool, 0/1 or a string
//! - A field of the wrong shape falls back to its default instead of failing
//!   the whole rule file; an empty `source` or `destination` never matches
//! - Equality and hashing are structural so a rule set can key the engine cache

use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Type name of the built-in path-pattern handler.
pub const PATH_TYPE: &str = "path";

/// Status used when a rule record omits `httpStatus`.
pub const DEFAULT_RULE_STATUS: u16 = 302;

/// Opaque rule identifier as it appears in the rule source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleId {
    Int(i64),
    Str(String),
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleId::Int(id) => write!(f, "{}", id),
            RuleId::Str(id) => f.write_str(id),
        }
    }
}

impl Default for RuleId {
    fn default() -> Self {
        RuleId::Str(String::new())
    }
}

impl From<i64> for RuleId {
    fn from(id: i64) -> Self {
        RuleId::Int(id)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        RuleId::Str(id.to_string())
    }
}

/// A single source → destination mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RedirectRule {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: RuleId,

    /// Path pattern; `*` matches one segment. A query suffix is ignored.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub source: String,

    /// Type handler name.
    #[serde(rename = "type", default = "default_type", deserialize_with = "deserialize_type")]
    pub rule_type: String,

    /// Path or absolute URL template; `*` is replaced by captures in order.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub destination: String,

    #[serde(rename = "httpStatus", default = "default_status", deserialize_with = "deserialize_status")]
    pub http_status: u16,

    #[serde(default = "default_active", deserialize_with = "deserialize_flag")]
    pub active: bool,
}

impl RedirectRule {
    /// Create an active `path` rule.
    pub fn new(
        id: impl Into<RuleId>,
        source: impl Into<String>,
        destination: impl Into<String>,
        http_status: u16,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            rule_type: default_type(),
            destination: destination.into(),
            http_status,
            active: true,
        }
    }

    /// Replace the handler type.
    pub fn with_type(mut self, rule_type: impl Into<String>) -> Self {
        self.rule_type = rule_type.into();
        self
    }

    /// Set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

fn default_type() -> String {
    PATH_TYPE.to_string()
}

fn default_status() -> u16 {
    DEFAULT_RULE_STATUS
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
    Other(IgnoredAny),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<RuleId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Int(i) => RuleId::Int(i),
        Scalar::Float(f) => RuleId::Str(f.to_string()),
        Scalar::Str(s) => RuleId::Str(s),
        Scalar::Other(_) => RuleId::default(),
    })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        _ => String::new(),
    })
}

fn deserialize_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        _ => default_type(),
    })
}

/// Numbers and numeric strings; anything else means the default status.
fn deserialize_status<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let status = match Scalar::deserialize(deserializer)? {
        Scalar::Int(i) => u16::try_from(i).ok(),
        Scalar::Float(f) if f.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&f) => {
            Some(f as u16)
        }
        Scalar::Str(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(status.unwrap_or(DEFAULT_RULE_STATUS))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Accept the truthy forms rule sources actually use.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Float(f) => f != 0.0,
        Flag::Str(s) => {
            let s = s.trim();
            !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false") || s.eq_ignore_ascii_case("off"))
        }
    })
}
