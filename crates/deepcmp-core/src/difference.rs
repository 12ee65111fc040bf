//! The output unit of a comparison.
use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::value::Value;

/// A divergence found at `path` between the actual and expected graphs.
///
/// Differences order by path, segment by segment, so a sorted list reads
/// from the root downward.
#[derive(Debug, Clone)]
pub struct ComparisonDifference {
    path: Vec<String>,
    actual: Value,
    expected: Value,
    note: Option<String>,
}

impl ComparisonDifference {
    /// Creates a difference without a note.
    pub fn new(path: Vec<String>, actual: Value, expected: Value) -> Self {
        Self {
            path,
            actual,
            expected,
            note: None,
        }
    }

    /// Creates a difference with an explanatory note.
    pub fn with_note(
        path: Vec<String>,
        actual: Value,
        expected: Value,
        note: impl Into<String>,
    ) -> Self {
        Self {
            path,
            actual,
            expected,
            note: Some(note.into()),
        }
    }

    /// Creates a difference between the two comparison roots.
    pub fn root(actual: Value, expected: Value, note: impl Into<String>) -> Self {
        Self::with_note(Vec::new(), actual, expected, note)
    }

    /// Path segments from the root; empty for a root difference.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Path segments joined with `.`.
    pub fn concatenated_path(&self) -> String {
        self.path.join(".")
    }

    /// The actual-side value.
    pub fn actual(&self) -> &Value {
        &self.actual
    }

    /// The expected-side value.
    pub fn expected(&self) -> &Value {
        &self.expected
    }

    /// Optional explanation of the divergence.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Ordering by path segments.
    pub fn cmp_by_path(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }

    /// Renders the difference for a failure message:
    ///
    /// ```text
    /// field/property 'address.city' differ:
    /// - actual value   : "Rome"
    /// - expected value : "Milan"
    /// ```
    ///
    /// followed by the note, if any, on its own line.
    pub fn multi_line_description(&self) -> String {
        self.to_string()
    }

    /// Serialisable projection of this difference.
    pub fn report(&self) -> DifferenceReport {
        DifferenceReport {
            path: self.concatenated_path(),
            actual: self.actual.to_string(),
            expected: self.expected.to_string(),
            note: self.note.clone(),
        }
    }
}

impl fmt::Display for ComparisonDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            writeln!(f, "top-level actual and expected objects differ:")?;
        } else {
            writeln!(f, "field/property '{}' differ:", self.concatenated_path())?;
        }
        writeln!(f, "- actual value   : {}", self.actual)?;
        write!(f, "- expected value : {}", self.expected)?;
        if let Some(note) = &self.note {
            write!(f, "\n{note}")?;
        }
        Ok(())
    }
}

/// Differences are equal when their paths are equal; see
/// [`ComparisonDifference::cmp_by_path`].
impl PartialEq for ComparisonDifference {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ComparisonDifference {}

impl PartialOrd for ComparisonDifference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComparisonDifference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_by_path(other)
    }
}

/// JSON-friendly rendering of a [`ComparisonDifference`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifferenceReport {
    /// Dotted path; empty at the root.
    pub path: String,
    /// Rendered actual value.
    pub actual: String,
    /// Rendered expected value.
    pub expected: String,
    /// Explanatory note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
