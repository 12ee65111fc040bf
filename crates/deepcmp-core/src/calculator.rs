//! Recursive difference calculator.
//!
//! Walks two object graphs side by side and collects every location where
//! they diverge. The walk is iterative: a LIFO stack of [`PathKey`]s is
//! seeded from the roots, and each popped pair is classified once into a
//! [`Strategy`] which either settles it (possibly recording a difference) or
//! pushes the pairs of its children back on the stack.
//!
//! Strategies are tried in a fixed precedence order:
//!
//! 1. same instance on both sides
//! 2. custom comparator (by field path, then by class)
//! 3. exactly one side null
//! 4. shape mismatch (collection, sorted set, sorted map, mapping, array)
//! 5. arrays, ordered collections, unordered collections, sorted maps,
//!    unordered maps
//! 6. equality declared by the actual value's class
//! 7. field-by-field decomposition
//!
//! Pairs that involve a sequence, mapping or object are recorded in a
//! visited set and never queued twice, which makes cyclic graphs terminate.
mod containers;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::class::{Class, EqualsFn};
use crate::config::{Comparator, ComparisonConfig};
use crate::difference::ComparisonDifference;
use crate::error::CompareError;
use crate::introspect::{ClassIntrospector, FieldIntrospector};
use crate::memo::EqualityMemo;
use crate::path_key::PathKey;
use crate::value::{MapKind, SeqKind, Value};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Computes the differences between two object graphs.
///
/// The calculator holds no per-comparison state and may be reused, including
/// from several threads when `I` is `Sync`. The only state shared between
/// comparisons is the [`EqualityMemo`].
pub struct RecursiveDifferenceCalculator<I = ClassIntrospector> {
    introspector: I,
    memo: Arc<EqualityMemo>,
}

impl RecursiveDifferenceCalculator<ClassIntrospector> {
    /// Creates a calculator reading fields from [`Class`] metadata and
    /// sharing the process-wide [`EqualityMemo::global`].
    pub fn new() -> Self {
        Self::with_memo(EqualityMemo::global(), ClassIntrospector)
    }
}

impl Default for RecursiveDifferenceCalculator<ClassIntrospector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: FieldIntrospector> RecursiveDifferenceCalculator<I> {
    /// Creates a calculator with an explicit memo and introspector.
    pub fn with_memo(memo: Arc<EqualityMemo>, introspector: I) -> Self {
        Self { introspector, memo }
    }

    /// The field introspector in use.
    pub fn introspector(&self) -> &I {
        &self.introspector
    }

    /// The equality memo in use.
    pub fn memo(&self) -> &Arc<EqualityMemo> {
        &self.memo
    }

    /// Compares `actual` against `expected` and returns every difference,
    /// sorted by path.
    ///
    /// With strict type checking enabled, an `expected` whose class does not
    /// extend the class of `actual` yields a single root difference and no
    /// traversal takes place.
    ///
    /// # Errors
    ///
    /// Returns the introspector's [`CompareError`] if a field cannot be read.
    /// No partial result is returned in that case.
    pub fn determine_differences(
        &self,
        actual: &Value,
        expected: &Value,
        config: &ComparisonConfig,
    ) -> Result<Vec<ComparisonDifference>, CompareError> {
        if config.is_strict_type_checking() {
            if let (Some(actual_class), Some(expected_class)) = (actual.class(), expected.class()) {
                if !expected_class.is_subclass_of(actual_class) {
                    debug!(
                        "strict type check failed at root: {} is not a subtype of {}",
                        expected_class, actual_class
                    );
                    return Ok(vec![ComparisonDifference::root(
                        actual.clone(),
                        expected.clone(),
                        format!(
                            "actual and expected are considered different since the comparison \
                             enforces strict type check and expected type {expected_class} is not \
                             a subtype of actual type {actual_class}"
                        ),
                    )]);
                }
            }
        }

        let traversal = Traversal {
            introspector: &self.introspector,
            memo: &self.memo,
            config,
        };
        let mut visited = HashSet::new();
        let differences = traversal.run(actual, expected, &[], true, &mut visited)?;
        debug!(
            "recursive comparison finished: {} difference(s), {} visited pair(s)",
            differences.len(),
            visited.len()
        );
        Ok(differences)
    }
}

// ---------------------------------------------------------------------------
// Work stack
// ---------------------------------------------------------------------------

/// LIFO stack of pending pairs that drops pairs the configuration ignores.
struct WorkStack<'c> {
    config: &'c ComparisonConfig,
    keys: Vec<PathKey>,
}

impl<'c> WorkStack<'c> {
    fn new(config: &'c ComparisonConfig) -> Self {
        Self {
            config,
            keys: Vec::new(),
        }
    }

    fn push(&mut self, key: PathKey) {
        if !self.config.should_ignore(&key) {
            self.keys.push(key);
        }
    }

    fn push_unvisited(&mut self, key: PathKey, visited: &HashSet<PathKey>) {
        if !visited.contains(&key) {
            self.push(key);
        }
    }

    fn pop(&mut self) -> Option<PathKey> {
        self.keys.pop()
    }

    fn retain_unvisited(&mut self, visited: &HashSet<PathKey>) {
        self.keys.retain(|key| !visited.contains(key));
    }
}

// ---------------------------------------------------------------------------
// Strategy classification
// ---------------------------------------------------------------------------

/// How a popped pair is compared.
enum Strategy {
    Identical,
    CustomComparator(Comparator),
    NullMismatch,
    ShapeMismatch,
    Array,
    OrderedCollection,
    UnorderedCollection,
    SortedMap,
    UnorderedMap,
    OverriddenEquals(EqualsFn),
    Fields,
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Borrowed view of everything one comparison needs.
struct Traversal<'a, I: ?Sized> {
    introspector: &'a I,
    memo: &'a EqualityMemo,
    config: &'a ComparisonConfig,
}

impl<I: FieldIntrospector + ?Sized> Traversal<'_, I> {
    /// Compares one pair of subgraphs rooted at `parent_path`, sharing
    /// `visited` with any enclosing comparison. `is_root` is set only for the
    /// top-level call; element trials of unordered collections are never
    /// roots, even when the collection itself sits at the empty path.
    fn run(
        &self,
        actual: &Value,
        expected: &Value,
        parent_path: &[String],
        is_root: bool,
        visited: &mut HashSet<PathKey>,
    ) -> Result<Vec<ComparisonDifference>, CompareError> {
        let mut stack = self.init_stack(actual, expected, parent_path, is_root, visited)?;
        let mut differences = Vec::new();

        while let Some(key) = stack.pop() {
            if key.involves_graph_node() {
                visited.insert(key.clone());
            }
            let equal = match self.classify(&key) {
                Strategy::Identical => true,
                Strategy::CustomComparator(comparator) => {
                    comparator(key.actual(), key.expected()) == Ordering::Equal
                }
                Strategy::NullMismatch | Strategy::ShapeMismatch => false,
                Strategy::Array | Strategy::OrderedCollection => {
                    self.compare_ordered(&key, &mut stack, visited)
                }
                Strategy::UnorderedCollection => {
                    self.compare_unordered(&key, &mut stack, visited)?
                }
                Strategy::SortedMap => self.compare_sorted_map(&key, &mut stack, visited),
                Strategy::UnorderedMap => self.compare_unordered_map(&key, &mut stack, visited)?,
                Strategy::OverriddenEquals(equals) => equals(key.actual(), key.expected()),
                Strategy::Fields => {
                    if let Some(difference) = self.compare_fields(&key, &mut stack, visited)? {
                        record(&mut differences, difference);
                    }
                    true
                }
            };
            if !equal {
                record(
                    &mut differences,
                    ComparisonDifference::new(
                        key.path().to_vec(),
                        key.actual().clone(),
                        key.expected().clone(),
                    ),
                );
            }
        }

        differences.sort_by(ComparisonDifference::cmp_by_path);
        Ok(differences)
    }

    /// Seeds the stack for a (sub)comparison.
    ///
    /// Two non-container values are decomposed into their fields right away,
    /// so that the top-level comparison reports per-field differences even
    /// when the root class declares its own equality. Below the top level a
    /// comparator registered for the pair wins over decomposition. When the
    /// actual class has no comparable fields, or the expected class lacks
    /// some of them, the pair is queued whole.
    fn init_stack(
        &self,
        actual: &Value,
        expected: &Value,
        parent_path: &[String],
        is_root: bool,
        visited: &HashSet<PathKey>,
    ) -> Result<WorkStack<'_>, CompareError> {
        let mut stack = WorkStack::new(self.config);
        let root = PathKey::new(parent_path.to_vec(), actual.clone(), expected.clone());
        let decomposable = !actual.is_null()
            && !expected.is_null()
            && !actual.is_container()
            && !expected.is_container()
            && (is_root || self.comparator_for(&root).is_none());

        if let (true, Some(actual_class), Some(expected_class)) =
            (decomposable, actual.class(), expected.class())
        {
            let names = self.kept_field_names(actual_class, parent_path);
            if !names.is_empty() && self.missing_fields(&names, expected_class).is_empty() {
                for name in &names {
                    let child = root.child(
                        name,
                        self.introspector.field_value(name, actual)?,
                        self.introspector.field_value(name, expected)?,
                    );
                    stack.push(child);
                }
                stack.retain_unvisited(visited);
                return Ok(stack);
            }
        }

        stack.push(root);
        stack.retain_unvisited(visited);
        Ok(stack)
    }

    fn classify(&self, key: &PathKey) -> Strategy {
        let (actual, expected) = (key.actual(), key.expected());
        if actual.same_ref(expected) {
            return Strategy::Identical;
        }
        if let Some(comparator) = self.comparator_for(key) {
            return Strategy::CustomComparator(comparator);
        }
        if actual.is_null() || expected.is_null() {
            return Strategy::NullMismatch;
        }
        if actual.is_collection() != expected.is_collection()
            || actual.is_sorted_set() != expected.is_sorted_set()
            || actual.is_sorted_map() != expected.is_sorted_map()
            || actual.is_mapping() != expected.is_mapping()
            || actual.is_array() != expected.is_array()
        {
            return Strategy::ShapeMismatch;
        }
        match actual.seq_kind() {
            Some(SeqKind::Array) => return Strategy::Array,
            Some(SeqKind::List | SeqKind::SortedSet) => return Strategy::OrderedCollection,
            Some(SeqKind::Set | SeqKind::Bag) => return Strategy::UnorderedCollection,
            None => {}
        }
        match actual.map_kind() {
            Some(MapKind::Sorted) => return Strategy::SortedMap,
            Some(MapKind::Hash) => return Strategy::UnorderedMap,
            None => {}
        }
        if let Some(class) = actual.class() {
            if !self.bypasses_overridden_equality(key, class) && self.memo.has_custom_equals(class)
            {
                if let Some(equals) = class.equals_fn() {
                    return Strategy::OverriddenEquals(Arc::clone(equals));
                }
            }
        }
        Strategy::Fields
    }

    /// Only user classes can have their equality bypassed; built-in scalars
    /// have no fields to fall back on.
    fn bypasses_overridden_equality(&self, key: &PathKey, class: &Class) -> bool {
        key.actual().as_object().is_some()
            && self
                .config
                .should_bypass_overridden_equality(&key.concatenated_path(), class)
    }

    /// The comparator in effect for a pair: the one registered for its path,
    /// else the one registered for the class of whichever side is non-null.
    fn comparator_for(&self, key: &PathKey) -> Option<Comparator> {
        self.config
            .comparator_for_field(&key.concatenated_path())
            .or_else(|| {
                let class = key.actual().class().or_else(|| key.expected().class())?;
                self.config.comparator_for_type(class)
            })
            .cloned()
    }

    /// Field-by-field comparison. Returns the difference to record when the
    /// pair cannot be decomposed, otherwise queues one pair per field.
    fn compare_fields(
        &self,
        key: &PathKey,
        stack: &mut WorkStack<'_>,
        visited: &HashSet<PathKey>,
    ) -> Result<Option<ComparisonDifference>, CompareError> {
        let (Some(actual_class), Some(expected_class)) = (key.actual().class(), key.expected().class())
        else {
            return Ok(None);
        };

        if self.config.is_strict_type_checking() && !expected_class.is_subclass_of(actual_class) {
            return Ok(Some(ComparisonDifference::with_note(
                key.path().to_vec(),
                key.actual().clone(),
                key.expected().clone(),
                format!(
                    "the fields are considered different since the comparison enforces strict \
                     type check and {expected_class} is not a subtype of {actual_class}"
                ),
            )));
        }

        let names = self.kept_field_names(actual_class, key.path());
        let missing = self.missing_fields(&names, expected_class);
        if !missing.is_empty() {
            return Ok(Some(ComparisonDifference::with_note(
                key.path().to_vec(),
                key.actual().clone(),
                key.expected().clone(),
                format!(
                    "{actual_class} can't be compared to {expected_class} as {} does not declare \
                     all {} fields, it lacks these:[{}]",
                    expected_class.simple_name(),
                    actual_class.simple_name(),
                    missing.join(", ")
                ),
            )));
        }

        for name in &names {
            let child = key.child(
                name,
                self.introspector.field_value(name, key.actual())?,
                self.introspector.field_value(name, key.expected())?,
            );
            stack.push_unvisited(child, visited);
        }
        Ok(None)
    }

    /// Declared field names of `class` that are not ignored under `parent_path`.
    fn kept_field_names(&self, class: &Class, parent_path: &[String]) -> Vec<String> {
        self.introspector
            .declared_field_names(class)
            .into_iter()
            .filter(|name| self.config.should_keep_field(parent_path, name))
            .collect()
    }

    /// Names in `names` that `class` does not declare, sorted.
    fn missing_fields(&self, names: &[String], class: &Class) -> Vec<String> {
        let declared: HashSet<String> = self
            .introspector
            .declared_field_names(class)
            .into_iter()
            .collect();
        let mut missing: Vec<String> = names
            .iter()
            .filter(|name| !declared.contains(*name))
            .cloned()
            .collect();
        missing.sort();
        missing
    }
}

fn record(differences: &mut Vec<ComparisonDifference>, difference: ComparisonDifference) {
    trace!(
        "difference at '{}': {} vs {}",
        difference.concatenated_path(),
        difference.actual(),
        difference.expected()
    );
    differences.push(difference);
}
