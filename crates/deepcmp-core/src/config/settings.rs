//! Declarative, serialisable subset of a [`ComparisonConfig`](super::ComparisonConfig).
//!
//! Comparators and class references cannot be expressed as data, so only
//! the rules that are plain strings and flags are covered here.
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Comparison rules loaded from JSON.
///
/// Every field is optional in the input; missing fields take their default.
///
/// ```json
/// {
///   "ignore_all_actual_null_fields": true,
///   "ignored_fields": ["address.city"],
///   "ignored_field_regexes": [".*\\.id"],
///   "strict_type_checking": false
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonSettings {
    /// Skip every pair whose actual value is null.
    pub ignore_all_actual_null_fields: bool,
    /// Exact dotted paths to ignore.
    pub ignored_fields: Vec<String>,
    /// Regexes matched against whole dotted paths to ignore.
    pub ignored_field_regexes: Vec<String>,
    /// Never use a class's own equality.
    pub ignore_all_overridden_equals: bool,
    /// Dotted paths at which overridden equality is bypassed.
    pub overridden_equals_ignored_fields: Vec<String>,
    /// Regexes over qualified class names for which overridden equality is
    /// bypassed.
    pub overridden_equals_ignored_regexes: Vec<String>,
    /// Enforce that expected's class extends actual's class.
    pub strict_type_checking: bool,
}

impl ComparisonSettings {
    /// Parses settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Settings`] if the document is not valid JSON or
    /// contains unknown keys.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialises the settings as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Settings`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
