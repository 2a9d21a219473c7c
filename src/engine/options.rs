//! Engine options.

use serde::{Deserialize, Serialize};

use crate::error::RedirectError;
use crate::routing::pattern::{decode_path, normalize_path};
use crate::rules::deserialize_flag;

/// Recognized option keys.
pub const OPTION_NAMES: [&str; 3] = ["enabled", "forcehttps", "excludes"];

/// Switches applied to every processing pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectOptions {
    /// When false the engine never redirects.
    #[serde(deserialize_with = "deserialize_flag")]
    pub enabled: bool,

    /// Redirect insecure requests to the secure scheme.
    #[serde(rename = "forcehttps", deserialize_with = "deserialize_flag")]
    pub force_https: bool,

    /// Paths never redirected, compared after trailing-slash normalization.
    pub excludes: Vec<String>,
}

impl Default for RedirectOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            force_https: false,
            excludes: Vec::new(),
        }
    }
}

/// Value of a single option looked up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag(bool),
    Paths(Vec<String>),
}

impl RedirectOptions {
    /// Look an option up by its configuration key.
    pub fn get(&self, name: &str) -> Result<OptionValue, RedirectError> {
        match name {
            "enabled" => Ok(OptionValue::Flag(self.enabled)),
            "forcehttps" => Ok(OptionValue::Flag(self.force_https)),
            "excludes" => Ok(OptionValue::Paths(self.excludes.clone())),
            _ => Err(RedirectError::UnknownOption(name.to_string())),
        }
    }

    /// True when `path` is listed in `excludes`.
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = decode_path(normalize_path(path));
        self.excludes
            .iter()
            .any(|excluded| decode_path(normalize_path(excluded)) == path)
    }
}
