//! Property-based tests for the recursive difference calculator.
//!
//! Verifies reflexivity on arbitrary generated graphs, permutation
//! insensitivity of unordered collections (including elements and map keys
//! that share a deep hash), and determinism of the result.
#![allow(clippy::expect_used)]

use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use deepcmp_core::{Class, ComparisonConfig, Value, determine_differences};
use proptest::prelude::*;

static ITEM: LazyLock<Arc<Class>> = LazyLock::new(|| {
    Class::builder("prop.Item")
        .fields(["label", "weight", "children"])
        .build()
});

static POINT: LazyLock<Arc<Class>> =
    LazyLock::new(|| Class::builder("prop.Point").fields(["x", "y"]).build());

/// Offsets that all round to the same integer, so the floats built from one
/// base share a deep hash.
const OFFSETS: [f64; 4] = [-0.3, -0.1, 0.1, 0.3];

fn point(&(x, y): &(i64, i64)) -> Value {
    Value::object(&POINT, [("x", Value::from(x)), ("y", Value::from(y))])
}

fn rotated<T: Clone>(items: &[T], seed: u64) -> Vec<T> {
    let mut out = items.to_vec();
    if !out.is_empty() {
        let len = out.len();
        out.rotate_left((seed as usize) % len);
    }
    out
}

fn bucketed_floats(picks: &BTreeSet<(i64, usize)>) -> Vec<f64> {
    picks
        .iter()
        .map(|&(base, offset)| base as f64 + OFFSETS[offset])
        .collect()
}

/// A JSON-like description of a value, cheap to clone and to build twice.
#[derive(Debug, Clone)]
enum Shape {
    Null,
    Int(i64),
    Text(String),
    List(Vec<Shape>),
    Bag(Vec<Shape>),
    Item(String, i64, Vec<Shape>),
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        Just(Shape::Null),
        (-50i64..50).prop_map(Shape::Int),
        "[a-z]{0,6}".prop_map(Shape::Text),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Shape::List),
            prop::collection::vec(inner.clone(), 0..5).prop_map(Shape::Bag),
            ("[a-z]{1,4}", 0i64..10, prop::collection::vec(inner, 0..3))
                .prop_map(|(label, weight, children)| Shape::Item(label, weight, children)),
        ]
    })
}

/// Builds a fresh graph: no instance is shared between two builds.
fn build(shape: &Shape) -> Value {
    match shape {
        Shape::Null => Value::Null,
        Shape::Int(n) => Value::from(*n),
        Shape::Text(s) => Value::from(s.as_str()),
        Shape::List(items) => Value::list(items.iter().map(build)),
        Shape::Bag(items) => Value::bag(items.iter().map(build)),
        Shape::Item(label, weight, children) => Value::object(
            &ITEM,
            [
                ("label", Value::from(label.as_str())),
                ("weight", Value::from(*weight)),
                ("children", Value::list(children.iter().map(build))),
            ],
        ),
    }
}

fn paths(actual: &Value, expected: &Value, config: &ComparisonConfig) -> Vec<String> {
    determine_differences(actual, expected, config)
        .expect("comparison succeeds")
        .iter()
        .map(|d| d.concatenated_path())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn a_graph_equals_itself(s in shape()) {
        let value = build(&s);
        prop_assert!(paths(&value, &value, &ComparisonConfig::new()).is_empty());
    }

    #[test]
    fn a_graph_equals_an_independent_copy(s in shape()) {
        prop_assert!(paths(&build(&s), &build(&s), &ComparisonConfig::new()).is_empty());
    }

    #[test]
    fn sets_ignore_permutation(
        labels in prop::collection::btree_set("[a-z]{1,5}", 0..8),
        seed in any::<u64>(),
    ) {
        let ordered: Vec<String> = labels.into_iter().collect();
        let shuffled = rotated(&ordered, seed);
        let actual = Value::set(ordered.iter().map(|s| Value::from(s.as_str())));
        let expected = Value::set(shuffled.iter().map(|s| Value::from(s.as_str())));
        prop_assert!(paths(&actual, &expected, &ComparisonConfig::new()).is_empty());
    }

    #[test]
    fn sets_of_points_with_swapped_coordinates_ignore_permutation(
        coords in prop::collection::btree_set((0i64..6, 0i64..6), 1..8),
        seed in any::<u64>(),
    ) {
        let with_swapped: BTreeSet<(i64, i64)> =
            coords.iter().flat_map(|&(x, y)| [(x, y), (y, x)]).collect();
        let ordered: Vec<(i64, i64)> = with_swapped.into_iter().collect();
        let actual = Value::set(ordered.iter().map(point));
        let expected = Value::set(rotated(&ordered, seed).iter().map(point));
        prop_assert!(paths(&actual, &expected, &ComparisonConfig::new()).is_empty());
    }

    #[test]
    fn sets_of_floats_sharing_a_rounding_bucket_ignore_permutation(
        picks in prop::collection::btree_set((-5i64..5, 0usize..4), 1..10),
        seed in any::<u64>(),
    ) {
        let ordered = bucketed_floats(&picks);
        let actual = Value::set(ordered.iter().map(|&x| Value::from(x)));
        let expected = Value::set(rotated(&ordered, seed).into_iter().map(Value::from));
        prop_assert!(paths(&actual, &expected, &ComparisonConfig::new()).is_empty());
    }

    #[test]
    fn maps_with_colliding_keys_ignore_entry_order(
        picks in prop::collection::btree_set((-5i64..5, 0usize..4), 1..10),
        seed in any::<u64>(),
    ) {
        let keys = bucketed_floats(&picks);
        let entries: Vec<(f64, String)> = keys.iter().map(|&k| (k, format!("v{k}"))).collect();
        let build = |entries: &[(f64, String)]| {
            Value::map(
                entries
                    .iter()
                    .map(|(k, v)| (Value::from(*k), Value::from(v.as_str()))),
            )
        };
        let actual = build(&entries);
        let expected = build(&rotated(&entries, seed));
        prop_assert!(paths(&actual, &expected, &ComparisonConfig::new()).is_empty());
    }

    #[test]
    fn results_are_deterministic(a in shape(), b in shape()) {
        let actual = build(&a);
        let expected = build(&b);
        let config = ComparisonConfig::new();
        let first = paths(&actual, &expected, &config);
        let second = paths(&actual, &expected, &config);
        prop_assert_eq!(&first, &second);
        let mut sorted = first.clone();
        sorted.sort();
        prop_assert_eq!(first, sorted);
    }
}
