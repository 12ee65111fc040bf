#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod calculator;
pub mod class;
pub mod config;
pub mod deep_hash;
pub mod difference;
pub mod error;
pub mod introspect;
pub mod memo;
pub mod path_key;
pub mod value;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use calculator::RecursiveDifferenceCalculator;
pub use class::{Class, ClassBuilder, ClassId, EqualsFn, HashFn};
pub use config::{Comparator, ComparisonConfig, ComparisonSettings};
pub use deep_hash::deep_hash;
pub use difference::{ComparisonDifference, DifferenceReport};
pub use error::{CompareError, ConfigError};
pub use introspect::{ClassIntrospector, FieldIntrospector};
pub use memo::EqualityMemo;
pub use path_key::PathKey;
pub use value::{Identity, MapKind, Mapping, Object, SeqKind, Sequence, Value};

/// Compares two graphs with a calculator that reads [`Class`] metadata and
/// shares the process-wide [`EqualityMemo`].
///
/// # Errors
///
/// See [`RecursiveDifferenceCalculator::determine_differences`].
pub fn determine_differences(
    actual: &Value,
    expected: &Value,
    config: &ComparisonConfig,
) -> Result<Vec<ComparisonDifference>, CompareError> {
    RecursiveDifferenceCalculator::new().determine_differences(actual, expected, config)
}

/// Returns the current version of the deepcmp-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn version_is_semver() {
        let v = version();
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "version should have 3 parts: {v}");
        for part in parts {
            part.parse::<u32>().expect("each part should be a number");
        }
    }

    #[test]
    fn convenience_entry_point_uses_default_calculator() {
        let found = determine_differences(
            &Value::list([Value::from(1)]),
            &Value::list([Value::from(2)]),
            &ComparisonConfig::new(),
        )
        .expect("comparison succeeds");
        assert_eq!(found.len(), 1);
    }
}
