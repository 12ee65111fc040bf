#![allow(clippy::expect_used)]

use std::cmp::Ordering;

use super::*;
use crate::error::ConfigError;

fn key_with_path(segments: &[&str]) -> PathKey {
    PathKey::new(
        segments.iter().map(|s| (*s).to_owned()).collect(),
        Value::list([]),
        Value::list([]),
    )
}

// ---------------------------------------------------------------------------
// Ignoring fields
// ---------------------------------------------------------------------------

#[test]
fn ignored_fields_are_registered_without_duplicates() {
    let mut config = ComparisonConfig::new();
    config.ignore_fields(&["foo", "bar", "foo.bar", "bar"]);
    assert_eq!(config.ignored_fields(), ["foo", "bar", "foo.bar"]);
}

#[test]
fn pairs_with_null_actual_are_ignored() {
    let mut config = ComparisonConfig::new();
    config.ignore_all_actual_null_fields(true);

    for expected in [Value::from("John"), Value::from(123), Value::Null, Value::list([])] {
        let key = PathKey::new(vec!["any".into()], Value::Null, expected);
        assert!(config.should_ignore(&key), "{key:?} should be ignored");
    }
    let key = PathKey::new(vec!["any".into()], Value::from(1), Value::Null);
    assert!(!config.should_ignore(&key));
}

#[test]
fn specified_fields_are_ignored() {
    let cases: [(&[&str], &[&str]); 4] = [
        (&["name"], &["name"]),
        (&["name"], &["foo", "name", "foo"]),
        (&["name", "first"], &["name.first"]),
        (&["father", "name", "first"], &["father", "name.first", "father.name.first"]),
    ];
    for (path, ignored) in cases {
        let mut config = ComparisonConfig::new();
        config.ignore_fields(ignored);
        let key = key_with_path(path);
        assert!(config.should_ignore(&key), "{key:?} should be ignored with {ignored:?}");
    }
}

#[test]
fn ignoring_a_parent_does_not_ignore_the_exact_child_path() {
    let mut config = ComparisonConfig::new();
    config.ignore_fields(&["name"]);
    assert!(!config.should_ignore_field("name.first"));
    assert!(config.should_keep_field(&["name".to_owned()], "first"));
    assert!(!config.should_keep_field(&[], "name"));
}

#[test]
fn fields_matching_regexes_are_ignored() {
    let cases: [(&[&str], &[&str]); 6] = [
        (&["name"], &[".*name"]),
        (&["name"], &["foo", "n.m.", "foo"]),
        (&["name", "first"], &["name\\.first"]),
        (&["name", "first"], &[".*first"]),
        (&["name", "first"], &["name.*"]),
        (&["father", "name", "first"], &["father", "name.first", "father\\.name\\.first"]),
    ];
    for (path, regexes) in cases {
        let mut config = ComparisonConfig::new();
        config
            .ignore_fields_matching_regexes(regexes)
            .expect("valid regexes");
        let key = key_with_path(path);
        assert!(config.should_ignore(&key), "{key:?} should be ignored with {regexes:?}");
    }
}

#[test]
fn regexes_must_match_the_whole_path() {
    let mut config = ComparisonConfig::new();
    config
        .ignore_fields_matching_regexes(&["name"])
        .expect("valid regex");
    assert!(!config.should_ignore_field("name.first"));
    assert!(!config.should_ignore_field("nickname"));
}

#[test]
fn invalid_regex_is_rejected_and_leaves_config_untouched() {
    let mut config = ComparisonConfig::new();
    let err = config
        .ignore_fields_matching_regexes(&["ok", "(unclosed"])
        .expect_err("invalid regex");
    assert!(
        matches!(&err, ConfigError::InvalidRegex { pattern, .. } if pattern == "(unclosed"),
        "unexpected error: {err}"
    );
    assert!(!config.should_ignore_field("ok"));
}

// ---------------------------------------------------------------------------
// Comparators
// ---------------------------------------------------------------------------

#[test]
fn field_comparator_lookup_is_exact() {
    let mut config = ComparisonConfig::new();
    assert!(!config.has_any_custom_comparators());
    config.register_comparator_for_field("address.city", |_, _| Ordering::Equal);

    assert!(config.has_any_custom_comparators());
    assert!(config.comparator_for_field("address.city").is_some());
    assert!(config.comparator_for_field("address").is_none());
}

#[test]
fn type_comparator_applies_to_descendants_closest_first() {
    let animal = Class::builder("zoo.Animal").build();
    let dog = Class::builder("zoo.Dog").extends(&animal).build();
    let puppy = Class::builder("zoo.Puppy").extends(&dog).build();
    let rock = Class::builder("geo.Rock").build();

    let mut config = ComparisonConfig::new();
    config
        .register_comparator_for_type(&animal, |_, _| Ordering::Less)
        .register_comparator_for_type(&dog, |_, _| Ordering::Greater);

    let for_puppy = config.comparator_for_type(&puppy).expect("inherited comparator");
    assert_eq!(for_puppy(&Value::Null, &Value::Null), Ordering::Greater);
    let for_animal = config.comparator_for_type(&animal).expect("own comparator");
    assert_eq!(for_animal(&Value::Null, &Value::Null), Ordering::Less);
    assert!(config.comparator_for_type(&rock).is_none());
}

#[test]
fn registering_twice_replaces_the_comparator() {
    let mut config = ComparisonConfig::new();
    config
        .register_comparator_for_field("x", |_, _| Ordering::Less)
        .register_comparator_for_field("x", |_, _| Ordering::Equal);
    let comparator = config.comparator_for_field("x").expect("comparator");
    assert_eq!(comparator(&Value::Null, &Value::Null), Ordering::Equal);
}

// ---------------------------------------------------------------------------
// Overridden equality
// ---------------------------------------------------------------------------

#[test]
fn overridden_equality_bypass_rules() {
    let money = Class::builder("bank.Money").build();
    let euro = Class::builder("bank.Euro").extends(&money).build();
    let label = Class::builder("text.Label").build();

    let mut config = ComparisonConfig::new();
    assert!(!config.should_bypass_overridden_equality("price", &money));

    config
        .ignore_overridden_equals_for_fields(&["total"])
        .ignore_overridden_equals_for_types(&[&money]);
    config
        .ignore_overridden_equals_by_regexes(&["text\\..*"])
        .expect("valid regex");

    assert!(config.should_bypass_overridden_equality("total", &euro));
    assert!(config.should_bypass_overridden_equality("price", &money));
    assert!(!config.should_bypass_overridden_equality("price", &euro));
    assert!(config.should_bypass_overridden_equality("price", &label));

    config.ignore_all_overridden_equals();
    assert!(config.should_bypass_overridden_equality("price", &euro));
}

// ---------------------------------------------------------------------------
// Description
// ---------------------------------------------------------------------------

#[test]
fn describes_ignored_null_fields() {
    let mut config = ComparisonConfig::new();
    config.ignore_all_actual_null_fields(true);
    assert!(
        config
            .multi_line_description()
            .contains("- all actual null fields were ignored in the comparison\n")
    );
}

#[test]
fn describes_ignored_fields_and_regexes() {
    let mut config = ComparisonConfig::new();
    config.ignore_fields(&["foo", "bar", "foo.bar"]);
    config
        .ignore_fields_matching_regexes(&["foo", "bar", "foo.bar"])
        .expect("valid regexes");
    let description = config.multi_line_description();
    assert!(description.contains(
        "- the following fields were ignored in the comparison: foo, bar, foo.bar\n"
    ));
    assert!(description.contains(
        "- the fields matching the following regexes were ignored in the comparison: foo, bar, foo.bar\n"
    ));
}

#[test]
fn describes_overridden_equality_exceptions() {
    let string = Class::builder("lang.String").build();
    let multimap = Class::builder("collect.Multimap").build();

    let mut config = ComparisonConfig::new();
    config.ignore_overridden_equals_for_types(&[&string, &multimap]);
    assert!(config.multi_line_description().contains(
        "- overridden equals methods were used in the comparison, except for:\n\
         --- the following types: lang.String, collect.Multimap\n"
    ));
}

#[test]
fn describes_default_and_disabled_overridden_equality() {
    let mut config = ComparisonConfig::new();
    assert_eq!(
        config.multi_line_description(),
        "- overridden equals methods were used in the comparison\n"
    );
    config.ignore_all_overridden_equals();
    assert_eq!(
        config.multi_line_description(),
        "- no overridden equals methods were used in the comparison\n"
    );
}

#[test]
fn complete_description() {
    let string = Class::builder("lang.String").build();
    let multimap = Class::builder("collect.Multimap").build();

    let mut config = ComparisonConfig::new();
    config
        .ignore_all_actual_null_fields(true)
        .ignore_fields(&["foo", "bar", "foo.bar"])
        .ignore_overridden_equals_for_types(&[&string, &multimap])
        .ignore_overridden_equals_for_fields(&["foo", "baz", "foo.baz"]);
    config
        .ignore_fields_matching_regexes(&["f.*", ".ba.", "..b%sr.."])
        .expect("valid regexes");
    config
        .ignore_overridden_equals_by_regexes(&[".*oo", ".ar", "oo.ba"])
        .expect("valid regexes");

    assert_eq!(
        config.multi_line_description(),
        "- all actual null fields were ignored in the comparison\n\
         - the following fields were ignored in the comparison: foo, bar, foo.bar\n\
         - the fields matching the following regexes were ignored in the comparison: f.*, .ba., ..b%sr..\n\
         - overridden equals methods were used in the comparison, except for:\n\
         --- the following fields: foo, baz, foo.baz\n\
         --- the following types: lang.String, collect.Multimap\n\
         --- the types matching the following regexes: .*oo, .ar, oo.ba\n"
    );
}

#[test]
fn describes_comparators_and_strict_mode() {
    let point = Class::builder("geo.Point").build();
    let mut config = ComparisonConfig::new();
    config
        .register_comparator_for_type(&point, |_, _| Ordering::Equal)
        .register_comparator_for_field("a.b", |_, _| Ordering::Equal)
        .strict_type_checking(true);

    let description = config.multi_line_description();
    assert!(description.contains("- these types were compared with custom comparators:\n--- geo.Point\n"));
    assert!(description.contains("- these fields were compared with custom comparators:\n--- a.b\n"));
    assert!(description.contains("were considered different when of incompatible types"));
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[test]
fn settings_build_an_equivalent_config() {
    let settings = ComparisonSettings::from_json(
        r#"{
            "ignore_all_actual_null_fields": true,
            "ignored_fields": ["address.city"],
            "ignored_field_regexes": [".*\\.id"],
            "strict_type_checking": true
        }"#,
    )
    .expect("valid settings");
    let config = ComparisonConfig::from_settings(&settings).expect("valid config");

    assert!(config.ignores_all_actual_null_fields());
    assert!(config.is_strict_type_checking());
    assert!(config.should_ignore_field("address.city"));
    assert!(config.should_ignore_field("owner.id"));
    assert!(!config.should_ignore_field("address.zip"));
}

#[test]
fn settings_reject_unknown_keys() {
    let err = ComparisonSettings::from_json(r#"{"ignore_everything": true}"#)
        .expect_err("unknown key");
    assert!(matches!(err, ConfigError::Settings(_)));
}

#[test]
fn settings_with_bad_regex_fail_to_build() {
    let settings = ComparisonSettings {
        overridden_equals_ignored_regexes: vec!["[".to_owned()],
        ..ComparisonSettings::default()
    };
    assert!(ComparisonConfig::from_settings(&settings).is_err());
}

#[test]
fn settings_survive_json() {
    let settings = ComparisonSettings {
        ignored_fields: vec!["a".to_owned()],
        ignore_all_overridden_equals: true,
        ..ComparisonSettings::default()
    };
    let json = settings.to_json().expect("serialise");
    assert_eq!(ComparisonSettings::from_json(&json).expect("parse"), settings);
}
