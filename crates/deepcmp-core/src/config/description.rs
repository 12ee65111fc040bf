//! Human-readable summary of a [`ComparisonConfig`], one line per active rule.
use std::fmt;

use super::{ComparisonConfig, PatternRule};

/// [`fmt::Display`] adapter returned by [`ComparisonConfig::description`].
pub struct Description<'a>(&'a ComparisonConfig);

fn join_patterns(rules: &[PatternRule]) -> String {
    rules
        .iter()
        .map(|rule| rule.pattern.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ComparisonConfig {
    /// Describes the configuration, one `- ` line per active rule, each line
    /// terminated by a newline.
    pub fn multi_line_description(&self) -> String {
        self.description().to_string()
    }

    /// Lazily formatted form of [`Self::multi_line_description`].
    pub fn description(&self) -> Description<'_> {
        Description(self)
    }
}

impl fmt::Display for Description<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        if config.ignore_all_actual_null_fields {
            writeln!(f, "- all actual null fields were ignored in the comparison")?;
        }
        if !config.ignored_fields.is_empty() {
            writeln!(
                f,
                "- the following fields were ignored in the comparison: {}",
                config.ignored_fields.join(", ")
            )?;
        }
        if !config.ignored_field_regexes.is_empty() {
            writeln!(
                f,
                "- the fields matching the following regexes were ignored in the comparison: {}",
                join_patterns(&config.ignored_field_regexes)
            )?;
        }
        self.overridden_equals(f)?;
        self.comparators(f)?;
        if config.strict_type_checking {
            writeln!(
                f,
                "- actual and expected objects and their fields were considered different when \
                 of incompatible types (i.e. expected type does not extend actual type) even if \
                 all their fields match"
            )?;
        }
        Ok(())
    }
}

impl Description<'_> {
    fn overridden_equals(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        if config.ignore_all_overridden_equals {
            return writeln!(f, "- no overridden equals methods were used in the comparison");
        }
        let has_exceptions = !config.overridden_equals_ignored_fields.is_empty()
            || !config.overridden_equals_ignored_types.is_empty()
            || !config.overridden_equals_ignored_regexes.is_empty();
        if !has_exceptions {
            return writeln!(f, "- overridden equals methods were used in the comparison");
        }
        writeln!(
            f,
            "- overridden equals methods were used in the comparison, except for:"
        )?;
        if !config.overridden_equals_ignored_fields.is_empty() {
            writeln!(
                f,
                "--- the following fields: {}",
                config.overridden_equals_ignored_fields.join(", ")
            )?;
        }
        if !config.overridden_equals_ignored_types.is_empty() {
            let names: Vec<&str> = config
                .overridden_equals_ignored_types
                .iter()
                .map(|class| class.name())
                .collect();
            writeln!(f, "--- the following types: {}", names.join(", "))?;
        }
        if !config.overridden_equals_ignored_regexes.is_empty() {
            writeln!(
                f,
                "--- the types matching the following regexes: {}",
                join_patterns(&config.overridden_equals_ignored_regexes)
            )?;
        }
        Ok(())
    }

    fn comparators(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        if !config.type_comparators.is_empty() {
            writeln!(f, "- these types were compared with custom comparators:")?;
            for (class, _) in &config.type_comparators {
                writeln!(f, "--- {}", class.name())?;
            }
        }
        if !config.field_comparators.is_empty() {
            writeln!(f, "- these fields were compared with custom comparators:")?;
            for (path, _) in &config.field_comparators {
                writeln!(f, "--- {path}")?;
            }
        }
        Ok(())
    }
}
