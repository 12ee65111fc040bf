//! Container strategies of the traversal.
//!
//! Each function returns `Ok(false)` when the containers certainly differ
//! (the caller records one difference at the container's path) and
//! `Ok(true)` when they may be equal, in which case the element pairs still
//! to be verified have been pushed on the stack. Element pairs share the
//! container's path: no index or key segment is appended.
use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::{Traversal, WorkStack};
use crate::deep_hash::deep_hash;
use crate::error::CompareError;
use crate::introspect::FieldIntrospector;
use crate::path_key::PathKey;
use crate::value::{SeqKind, Value};

impl<I: FieldIntrospector + ?Sized> Traversal<'_, I> {
    /// Arrays and ordered collections: equal length, then i-th against i-th.
    pub(super) fn compare_ordered(
        &self,
        key: &PathKey,
        stack: &mut WorkStack<'_>,
        visited: &HashSet<PathKey>,
    ) -> bool {
        let (Some(actual), Some(expected)) = (key.actual().as_seq(), key.expected().as_seq())
        else {
            return false;
        };
        if actual.len() != expected.len() {
            return false;
        }
        for (a, e) in actual.items().into_iter().zip(expected.items()) {
            stack.push_unvisited(key.with_values(a, e), visited);
        }
        true
    }

    /// Unordered collections.
    ///
    /// A set compared without any custom comparator is matched element by
    /// element through [`deep_hash`]. Otherwise each actual element is
    /// matched against the first remaining expected element that compares
    /// with no difference, which costs a full sub-comparison per candidate.
    ///
    /// Trial sub-comparisons share the visited set of the enclosing
    /// traversal. A failed trial leaves its graph-node pairs behind, so a
    /// later candidate that reaches one of those pairs through a shared
    /// instance skips it and may match although that part differs.
    pub(super) fn compare_unordered(
        &self,
        key: &PathKey,
        stack: &mut WorkStack<'_>,
        visited: &mut HashSet<PathKey>,
    ) -> Result<bool, CompareError> {
        let (Some(actual), Some(expected)) = (key.actual().as_seq(), key.expected().as_seq())
        else {
            return Ok(false);
        };
        if actual.len() != expected.len() {
            return Ok(false);
        }

        if !self.config.has_any_custom_comparators() && actual.kind() == SeqKind::Set {
            trace!(
                "matching unordered collection at '{}' by deep hash",
                key.concatenated_path()
            );
            return self.match_by_hash(key, actual.items(), expected.items(), stack, visited);
        }

        trace!(
            "matching unordered collection at '{}' by pairwise comparison",
            key.concatenated_path()
        );
        let mut remaining = expected.items();
        for a in actual.items() {
            let mut matched = None;
            for (i, e) in remaining.iter().enumerate() {
                if self.trial_matches(key, &a, e, visited)? {
                    matched = Some(i);
                    break;
                }
            }
            if let Some(i) = matched {
                remaining.remove(i);
            }
        }
        Ok(remaining.is_empty())
    }

    /// Expected elements are bucketed by deep hash. Each actual element
    /// takes one element from its bucket; a miss is only declared once the
    /// bucket is exhausted.
    fn match_by_hash(
        &self,
        key: &PathKey,
        actual: Vec<Value>,
        expected: Vec<Value>,
        stack: &mut WorkStack<'_>,
        visited: &mut HashSet<PathKey>,
    ) -> Result<bool, CompareError> {
        let mut buckets: HashMap<i64, Vec<Value>> = HashMap::with_capacity(expected.len());
        for e in expected {
            buckets.entry(self.deep_hash(&e)?).or_default().push(e);
        }
        for a in actual {
            let Some(bucket) = buckets.get_mut(&self.deep_hash(&a)?) else {
                return Ok(false);
            };
            let Some(e) = self.take_candidate(key, &a, bucket, |e| e, visited)? else {
                return Ok(false);
            };
            stack.push_unvisited(key.with_values(a, e), visited);
        }
        Ok(true)
    }

    /// Sorted maps: equal size, then entries walked in lockstep. Keys and
    /// values are queued as separate pairs.
    pub(super) fn compare_sorted_map(
        &self,
        key: &PathKey,
        stack: &mut WorkStack<'_>,
        visited: &HashSet<PathKey>,
    ) -> bool {
        let (Some(actual), Some(expected)) = (key.actual().as_map(), key.expected().as_map())
        else {
            return false;
        };
        if actual.len() != expected.len() {
            return false;
        }
        for ((ak, av), (ek, ev)) in actual.entries().into_iter().zip(expected.entries()) {
            stack.push_unvisited(key.with_values(ak, ek), visited);
            stack.push_unvisited(key.with_values(av, ev), visited);
        }
        true
    }

    /// Unordered maps: equal size, then each actual entry is matched to an
    /// expected entry whose key has the same [`deep_hash`]. Keys and values
    /// are queued as separate pairs.
    pub(super) fn compare_unordered_map(
        &self,
        key: &PathKey,
        stack: &mut WorkStack<'_>,
        visited: &mut HashSet<PathKey>,
    ) -> Result<bool, CompareError> {
        let (Some(actual), Some(expected)) = (key.actual().as_map(), key.expected().as_map())
        else {
            return Ok(false);
        };
        if actual.len() != expected.len() {
            return Ok(false);
        }

        let mut buckets: HashMap<i64, Vec<(Value, Value)>> =
            HashMap::with_capacity(expected.len());
        for (ek, ev) in expected.entries() {
            buckets.entry(self.deep_hash(&ek)?).or_default().push((ek, ev));
        }
        for (ak, av) in actual.entries() {
            let Some(bucket) = buckets.get_mut(&self.deep_hash(&ak)?) else {
                return Ok(false);
            };
            let Some((ek, ev)) = self.take_candidate(key, &ak, bucket, |(k, _)| k, visited)?
            else {
                return Ok(false);
            };
            stack.push_unvisited(key.with_values(ak, ek), visited);
            stack.push_unvisited(key.with_values(av, ev), visited);
        }
        Ok(true)
    }

    /// Removes and returns the candidate of `bucket` that `actual` should be
    /// paired with. A lone candidate is taken as is and compared later on
    /// the stack. Among colliding candidates the first one that compares
    /// with no difference wins, falling back to the first one.
    fn take_candidate<T>(
        &self,
        key: &PathKey,
        actual: &Value,
        bucket: &mut Vec<T>,
        project: impl Fn(&T) -> &Value,
        visited: &mut HashSet<PathKey>,
    ) -> Result<Option<T>, CompareError> {
        if bucket.len() <= 1 {
            return Ok(bucket.pop());
        }
        let mut chosen = 0;
        for (i, candidate) in bucket.iter().enumerate() {
            if self.trial_matches(key, actual, project(candidate), visited)? {
                chosen = i;
                break;
            }
        }
        Ok(Some(bucket.remove(chosen)))
    }

    /// Runs a full sub-comparison of one element pair under the container's
    /// path and reports whether it found no difference.
    fn trial_matches(
        &self,
        key: &PathKey,
        actual: &Value,
        expected: &Value,
        visited: &mut HashSet<PathKey>,
    ) -> Result<bool, CompareError> {
        Ok(self
            .run(actual, expected, key.path(), false, visited)?
            .is_empty())
    }

    fn deep_hash(&self, value: &Value) -> Result<i64, CompareError> {
        deep_hash(value, self.introspector, self.memo)
    }
}
