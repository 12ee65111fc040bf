//! Cache of "does this class define its own equality / hash" answers.
//!
//! Both answers are found by walking the ancestor chain, which is cheap but
//! repeated for every node of every comparison. The memo caches them per
//! [`ClassId`] in two [`DashMap`]s so that comparisons running on different
//! threads can share one instance without blocking each other. A race on the
//! same class computes the same answer twice and stores it idempotently.
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;

use crate::class::{Class, ClassId};

static GLOBAL: LazyLock<Arc<EqualityMemo>> = LazyLock::new(|| Arc::new(EqualityMemo::new()));

/// Per-class cache of custom equality and hash declarations.
#[derive(Debug, Default)]
pub struct EqualityMemo {
    equals: DashMap<ClassId, bool>,
    hash: DashMap<ClassId, bool>,
}

impl EqualityMemo {
    /// Creates an empty memo, independent of the process-wide one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide memo shared by calculators built with
    /// [`crate::RecursiveDifferenceCalculator::new`].
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Returns `true` if `class` or one of its ancestors declares equality.
    pub fn has_custom_equals(&self, class: &Class) -> bool {
        lookup(&self.equals, class, Class::declares_equals)
    }

    /// Returns `true` if `class` or one of its ancestors declares a hash.
    pub fn has_custom_hash(&self, class: &Class) -> bool {
        lookup(&self.hash, class, Class::declares_hash)
    }

    /// Number of classes with a cached equality answer.
    pub fn len(&self) -> usize {
        self.equals.len()
    }

    /// Returns `true` if no equality answer has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.equals.is_empty()
    }

    /// Drops every cached answer.
    pub fn clear(&self) {
        self.equals.clear();
        self.hash.clear();
    }
}

fn lookup(cache: &DashMap<ClassId, bool>, class: &Class, declares: fn(&Class) -> bool) -> bool {
    if let Some(hit) = cache.get(&class.id()) {
        return *hit;
    }
    let answer = class.ancestors().any(declares);
    cache.insert(class.id(), answer);
    answer
}
