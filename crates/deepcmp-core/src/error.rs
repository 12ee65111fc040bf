//! Error types for recursive comparison and its configuration.
//!
//! Structural mismatches are never errors: they are reported as
//! [`crate::ComparisonDifference`] records. The errors here cover the two
//! fault classes that make a comparison result untrustworthy or impossible:
//! a field that cannot be read from an instance, and a configuration that
//! cannot be built.

/// Fatal errors that abort a comparison.
///
/// Raised by a [`crate::FieldIntrospector`] when it cannot read a field it
/// itself declared. A partial field read would make the difference list
/// incomplete, so the whole comparison is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    /// The instance does not carry a value for a field its class declares.
    #[error("field `{field}` is declared by {class} but missing from the instance")]
    MissingField {
        /// Qualified class name of the instance.
        class: String,
        /// Name of the field that could not be read.
        field: String,
    },

    /// A field was requested from a value that is not an object instance.
    #[error("cannot read field `{field}` from non-object value {found}")]
    NotAnObject {
        /// Name of the requested field.
        field: String,
        /// Rendering of the value the field was requested from.
        found: String,
    },
}

/// Errors raised while building a [`crate::ComparisonConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A field or type regex failed to compile.
    #[error("invalid regex `{pattern}`: {source}")]
    InvalidRegex {
        /// The pattern as supplied by the caller.
        pattern: String,
        /// Underlying compilation error.
        #[source]
        source: regex::Error,
    },

    /// Declarative settings could not be parsed.
    #[error("invalid comparison settings: {0}")]
    Settings(#[from] serde_json::Error),
}
