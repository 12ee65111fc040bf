//! Policy consulted by the calculator: what to ignore, what to compare with
//! custom comparators, when to trust a class's own equality.
//!
//! [`ComparisonConfig`] is assembled with `&mut self` builder calls and then
//! read, never modified, during a comparison.
mod description;
mod settings;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::class::Class;
use crate::error::ConfigError;
use crate::path_key::PathKey;
use crate::value::Value;

pub use description::Description;
pub use settings::ComparisonSettings;

/// A custom comparison: `Ordering::Equal` means the two values match.
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

// ---------------------------------------------------------------------------
// Pattern rules
// ---------------------------------------------------------------------------

/// A regex kept alongside the pattern it was compiled from.
///
/// The compiled form is anchored so that it must match the whole input.
#[derive(Clone)]
struct PatternRule {
    pattern: String,
    regex: Regex,
}

impl PatternRule {
    fn compile(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            ConfigError::InvalidRegex {
                pattern: pattern.to_owned(),
                source,
            }
        })?;
        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
        })
    }

    fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }
}

fn compile_all(patterns: &[&str]) -> Result<Vec<PatternRule>, ConfigError> {
    patterns.iter().map(|p| PatternRule::compile(p)).collect()
}

fn push_unique(target: &mut Vec<String>, items: &[&str]) {
    for item in items {
        if !target.iter().any(|existing| existing == item) {
            target.push((*item).to_owned());
        }
    }
}

// ---------------------------------------------------------------------------
// ComparisonConfig
// ---------------------------------------------------------------------------

/// Configuration of a recursive comparison.
///
/// The default configuration ignores nothing, registers no comparators, uses
/// overridden equality wherever a class declares one, and does not enforce
/// strict type checking.
#[derive(Clone, Default)]
pub struct ComparisonConfig {
    ignore_all_actual_null_fields: bool,
    ignored_fields: Vec<String>,
    ignored_field_regexes: Vec<PatternRule>,
    ignore_all_overridden_equals: bool,
    overridden_equals_ignored_fields: Vec<String>,
    overridden_equals_ignored_types: Vec<Arc<Class>>,
    overridden_equals_ignored_regexes: Vec<PatternRule>,
    field_comparators: Vec<(String, Comparator)>,
    type_comparators: Vec<(Arc<Class>, Comparator)>,
    strict_type_checking: bool,
}

impl ComparisonConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from declarative settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRegex`] if a regex does not compile.
    pub fn from_settings(settings: &ComparisonSettings) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        config
            .ignore_all_actual_null_fields(settings.ignore_all_actual_null_fields)
            .ignore_fields(&as_strs(&settings.ignored_fields))
            .ignore_overridden_equals_for_fields(&as_strs(&settings.overridden_equals_ignored_fields))
            .strict_type_checking(settings.strict_type_checking);
        config.ignore_fields_matching_regexes(&as_strs(&settings.ignored_field_regexes))?;
        config.ignore_overridden_equals_by_regexes(&as_strs(
            &settings.overridden_equals_ignored_regexes,
        ))?;
        if settings.ignore_all_overridden_equals {
            config.ignore_all_overridden_equals();
        }
        Ok(config)
    }

    // -- builder ------------------------------------------------------------

    /// Skips every pair whose actual value is null.
    pub fn ignore_all_actual_null_fields(&mut self, ignore: bool) -> &mut Self {
        self.ignore_all_actual_null_fields = ignore;
        self
    }

    /// Ignores the given dotted field paths. Duplicates are dropped.
    pub fn ignore_fields(&mut self, paths: &[&str]) -> &mut Self {
        push_unique(&mut self.ignored_fields, paths);
        self
    }

    /// Ignores every field whose full dotted path matches one of `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRegex`] for the first pattern that does
    /// not compile; the configuration is left unchanged in that case.
    pub fn ignore_fields_matching_regexes(
        &mut self,
        patterns: &[&str],
    ) -> Result<&mut Self, ConfigError> {
        let rules = compile_all(patterns)?;
        self.ignored_field_regexes.extend(rules);
        Ok(self)
    }

    /// Never uses a class's own equality; always compares field by field.
    pub fn ignore_all_overridden_equals(&mut self) -> &mut Self {
        self.ignore_all_overridden_equals = true;
        self
    }

    /// Bypasses overridden equality for values at the given dotted paths.
    pub fn ignore_overridden_equals_for_fields(&mut self, paths: &[&str]) -> &mut Self {
        push_unique(&mut self.overridden_equals_ignored_fields, paths);
        self
    }

    /// Bypasses overridden equality for instances of exactly these classes.
    pub fn ignore_overridden_equals_for_types(&mut self, classes: &[&Arc<Class>]) -> &mut Self {
        for class in classes {
            if !self
                .overridden_equals_ignored_types
                .iter()
                .any(|existing| existing.id() == class.id())
            {
                self.overridden_equals_ignored_types.push(Arc::clone(class));
            }
        }
        self
    }

    /// Bypasses overridden equality for classes whose qualified name matches
    /// one of `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRegex`] for the first pattern that does
    /// not compile.
    pub fn ignore_overridden_equals_by_regexes(
        &mut self,
        patterns: &[&str],
    ) -> Result<&mut Self, ConfigError> {
        let rules = compile_all(patterns)?;
        self.overridden_equals_ignored_regexes.extend(rules);
        Ok(self)
    }

    /// Compares values at `path` with `comparator`, replacing any comparator
    /// previously registered for the same path.
    pub fn register_comparator_for_field<F>(&mut self, path: &str, comparator: F) -> &mut Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        let comparator: Comparator = Arc::new(comparator);
        match self.field_comparators.iter_mut().find(|(p, _)| p == path) {
            Some(entry) => entry.1 = comparator,
            None => self.field_comparators.push((path.to_owned(), comparator)),
        }
        self
    }

    /// Compares instances of `class` and its descendants with `comparator`.
    pub fn register_comparator_for_type<F>(&mut self, class: &Arc<Class>, comparator: F) -> &mut Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        let comparator: Comparator = Arc::new(comparator);
        match self
            .type_comparators
            .iter_mut()
            .find(|(c, _)| c.id() == class.id())
        {
            Some(entry) => entry.1 = comparator,
            None => self.type_comparators.push((Arc::clone(class), comparator)),
        }
        self
    }

    /// Requires the expected value's class to be the actual value's class or
    /// one of its descendants.
    pub fn strict_type_checking(&mut self, strict: bool) -> &mut Self {
        self.strict_type_checking = strict;
        self
    }

    // -- queries ------------------------------------------------------------

    /// Returns `true` if strict type checking is enabled.
    pub fn is_strict_type_checking(&self) -> bool {
        self.strict_type_checking
    }

    /// Returns `true` if pairs with a null actual value are skipped.
    pub fn ignores_all_actual_null_fields(&self) -> bool {
        self.ignore_all_actual_null_fields
    }

    /// The exact paths registered with [`Self::ignore_fields`].
    pub fn ignored_fields(&self) -> &[String] {
        &self.ignored_fields
    }

    /// Returns `true` if the dotted `path` is ignored by name or by regex.
    pub fn should_ignore_field(&self, path: &str) -> bool {
        self.ignored_fields.iter().any(|ignored| ignored == path)
            || self.ignored_field_regexes.iter().any(|rule| rule.is_match(path))
    }

    /// Returns `true` if field `name` under `parent_path` takes part in the
    /// comparison.
    pub fn should_keep_field(&self, parent_path: &[String], name: &str) -> bool {
        let path = if parent_path.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{name}", parent_path.join("."))
        };
        !self.should_ignore_field(&path)
    }

    /// Returns `true` if the pair must not be compared at all.
    pub fn should_ignore(&self, key: &PathKey) -> bool {
        (self.ignore_all_actual_null_fields && key.actual().is_null())
            || self.should_ignore_field(&key.concatenated_path())
    }

    /// The comparator registered for the dotted `path`, if any.
    pub fn comparator_for_field(&self, path: &str) -> Option<&Comparator> {
        self.field_comparators
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c)
    }

    /// The comparator registered for `class` or its closest ancestor.
    pub fn comparator_for_type(&self, class: &Class) -> Option<&Comparator> {
        class.ancestors().find_map(|level| {
            self.type_comparators
                .iter()
                .find(|(c, _)| c.id() == level.id())
                .map(|(_, comparator)| comparator)
        })
    }

    /// Returns `true` if any field or type comparator is registered.
    pub fn has_any_custom_comparators(&self) -> bool {
        !self.field_comparators.is_empty() || !self.type_comparators.is_empty()
    }

    /// Returns `true` if a value of `class` at `path` must be compared field
    /// by field even though its class declares equality.
    pub fn should_bypass_overridden_equality(&self, path: &str, class: &Class) -> bool {
        self.ignore_all_overridden_equals
            || self
                .overridden_equals_ignored_fields
                .iter()
                .any(|ignored| ignored == path)
            || self
                .overridden_equals_ignored_types
                .iter()
                .any(|ignored| ignored.id() == class.id())
            || self
                .overridden_equals_ignored_regexes
                .iter()
                .any(|rule| rule.is_match(class.name()))
    }
}

fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

impl fmt::Debug for ComparisonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns =
            |rules: &[PatternRule]| rules.iter().map(|r| r.pattern.clone()).collect::<Vec<_>>();
        f.debug_struct("ComparisonConfig")
            .field("ignore_all_actual_null_fields", &self.ignore_all_actual_null_fields)
            .field("ignored_fields", &self.ignored_fields)
            .field("ignored_field_regexes", &patterns(&self.ignored_field_regexes))
            .field("ignore_all_overridden_equals", &self.ignore_all_overridden_equals)
            .field(
                "overridden_equals_ignored_fields",
                &self.overridden_equals_ignored_fields,
            )
            .field(
                "overridden_equals_ignored_types",
                &self
                    .overridden_equals_ignored_types
                    .iter()
                    .map(|c| c.name().to_owned())
                    .collect::<Vec<_>>(),
            )
            .field(
                "overridden_equals_ignored_regexes",
                &patterns(&self.overridden_equals_ignored_regexes),
            )
            .field(
                "field_comparators",
                &self.field_comparators.iter().map(|(p, _)| p.as_str()).collect::<Vec<_>>(),
            )
            .field(
                "type_comparators",
                &self.type_comparators.iter().map(|(c, _)| c.name()).collect::<Vec<_>>(),
            )
            .field("strict_type_checking", &self.strict_type_checking)
            .finish()
    }
}
