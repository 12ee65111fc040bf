//! Work items of the traversal: "compare these two values at this path".
//!
//! A [`PathKey`] is both the unit pushed on the calculator's work stack and
//! the marker stored in its visited set. Equality is what stops cycles:
//!
//! - when either value is a graph node (sequence, mapping or object), two
//!   keys are equal when they hold the *same instances*, whatever their
//!   path. A pair of nodes reached again through a cycle is therefore
//!   recognised as already visited even though its path has grown;
//! - when both values are leaves (null, booleans, numbers, strings), the
//!   path takes part in equality as well, so equal leaves found under
//!   different fields are each compared and reported.
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value::Value;

/// A pending or visited `(path, actual, expected)` triple.
#[derive(Clone)]
pub struct PathKey {
    path: Vec<String>,
    actual: Value,
    expected: Value,
}

impl PathKey {
    /// Creates a key at `path`.
    pub fn new(path: Vec<String>, actual: Value, expected: Value) -> Self {
        Self {
            path,
            actual,
            expected,
        }
    }

    /// Creates a key for the comparison root (empty path).
    pub fn root(actual: Value, expected: Value) -> Self {
        Self::new(Vec::new(), actual, expected)
    }

    /// Path segments from the root.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Path segments joined with `.`; empty at the root.
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

    /// Key for field `name` of this pair.
    pub fn child(&self, name: &str, actual: Value, expected: Value) -> Self {
        let mut path = self.path.clone();
        path.push(name.to_owned());
        Self::new(path, actual, expected)
    }

    /// Key for a pair of elements addressed by this key's own path.
    pub fn with_values(&self, actual: Value, expected: Value) -> Self {
        Self::new(self.path.clone(), actual, expected)
    }

    /// Returns `true` if either value is a sequence, mapping or object, i.e.
    /// the pair can be reached again through a cycle.
    pub fn involves_graph_node(&self) -> bool {
        self.actual.is_graph_node() || self.expected.is_graph_node()
    }
}

impl PartialEq for PathKey {
    fn eq(&self, other: &Self) -> bool {
        if self.actual.identity() != other.actual.identity()
            || self.expected.identity() != other.expected.identity()
        {
            return false;
        }
        self.involves_graph_node() || self.path == other.path
    }
}

impl Eq for PathKey {}

impl Hash for PathKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.actual.identity().hash(state);
        self.expected.identity().hash(state);
        if !self.involves_graph_node() {
            self.path.hash(state);
        }
    }
}

impl fmt::Debug for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PathKey [path={:?}, actual={}, expected={}]",
            self.concatenated_path(),
            self.actual,
            self.expected
        )
    }
}
