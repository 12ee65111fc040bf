#![allow(clippy::expect_used)]


use crate::test_helpers::{differences, paths};
use crate::{ComparisonConfig, Value};

#[test]
fn equal_scalar_roots() {
    let config = ComparisonConfig::new();
    assert!(differences(&Value::from("a"), &Value::from("a"), &config).is_empty());
    assert!(differences(&Value::from(7), &Value::from(7), &config).is_empty());
    assert!(differences(&Value::Null, &Value::Null, &config).is_empty());
}

#[test]
fn different_scalar_roots_differ_at_top_level() {
    let config = ComparisonConfig::new();
    let found = differences(&Value::from(1), &Value::from(2), &config);
    assert_eq!(paths(&found), vec![""]);
    assert_eq!(found[0].actual().as_i64(), Some(1));
    assert_eq!(found[0].expected().as_i64(), Some(2));
}

#[test]
fn integer_and_float_are_not_equal() {
    let config = ComparisonConfig::new();
    assert_eq!(differences(&Value::from(1), &Value::from(1.0), &config).len(), 1);
}

#[test]
fn null_root_against_value() {
    let config = ComparisonConfig::new();
    let found = differences(&Value::Null, &Value::from("x"), &config);
    assert_eq!(paths(&found), vec![""]);
}

#[test]
fn null_actual_root_is_ignored_when_null_fields_are_ignored() {
    let mut config = ComparisonConfig::new();
    config.ignore_all_actual_null_fields(true);
    assert!(differences(&Value::Null, &Value::from("x"), &config).is_empty());
}
