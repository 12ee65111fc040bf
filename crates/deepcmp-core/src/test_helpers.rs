//! Shared fixture classes and constructors for unit tests.
//!
//! Compiled only in test builds. Integration tests in
//! `crates/deepcmp-core/tests/` define their own fixtures because they link
//! against the non-test library build.
#![allow(clippy::expect_used)]

use std::sync::{Arc, LazyLock};

use crate::calculator::RecursiveDifferenceCalculator;
use crate::class::Class;
use crate::config::ComparisonConfig;
use crate::difference::ComparisonDifference;
use crate::introspect::ClassIntrospector;
use crate::memo::EqualityMemo;
use crate::value::Value;

/// `zoo.Address { street, city, zip }`.
pub static ADDRESS: LazyLock<Arc<Class>> = LazyLock::new(|| {
    Class::builder("zoo.Address")
        .fields(["street", "city", "zip"])
        .build()
});

/// `zoo.Person { name, age, address, pets, friend }`.
pub static PERSON: LazyLock<Arc<Class>> = LazyLock::new(|| {
    Class::builder("zoo.Person")
        .fields(["name", "age", "address", "pets", "friend"])
        .build()
});

/// `zoo.Employee extends zoo.Person { company }`.
pub static EMPLOYEE: LazyLock<Arc<Class>> = LazyLock::new(|| {
    Class::builder("zoo.Employee")
        .extends(&PERSON)
        .field("company")
        .build()
});

/// `bank.Money { amount, currency }` whose equality looks at `amount` only.
pub static MONEY: LazyLock<Arc<Class>> = LazyLock::new(|| {
    Class::builder("bank.Money")
        .fields(["amount", "currency"])
        .equals(|a, b| {
            let amount = |v: &Value| v.as_object().and_then(|o| o.get("amount"));
            match (amount(a), amount(b)) {
                (Some(x), Some(y)) => Value::scalar_eq(&x, &y),
                _ => false,
            }
        })
        .build()
});

/// `shop.Holder { price, owner, items }`, a plain container of fields.
pub static HOLDER: LazyLock<Arc<Class>> = LazyLock::new(|| {
    Class::builder("shop.Holder")
        .fields(["price", "owner", "items"])
        .build()
});

/// `graph.Node { id, next }`.
pub static NODE: LazyLock<Arc<Class>> =
    LazyLock::new(|| Class::builder("graph.Node").fields(["id", "next"]).build());

/// Builds an address.
pub fn address(street: &str, city: &str, zip: &str) -> Value {
    Value::object(
        &ADDRESS,
        [
            ("street", Value::from(street)),
            ("city", Value::from(city)),
            ("zip", Value::from(zip)),
        ],
    )
}

/// Builds a person with a default address and no pets.
pub fn person(name: &str, age: i64) -> Value {
    Value::object(
        &PERSON,
        [
            ("name", Value::from(name)),
            ("age", Value::from(age)),
            ("address", address("Via Roma 1", "Rome", "00100")),
        ],
    )
}

/// Builds an amount of money.
pub fn money(amount: i64, currency: &str) -> Value {
    Value::object(
        &MONEY,
        [("amount", Value::from(amount)), ("currency", Value::from(currency))],
    )
}

/// Builds a holder with the given fields set.
pub fn holder(fields: impl IntoIterator<Item = (&'static str, Value)>) -> Value {
    Value::object(&HOLDER, fields)
}

/// A calculator with a fresh memo.
pub fn calculator() -> RecursiveDifferenceCalculator {
    RecursiveDifferenceCalculator::with_memo(Arc::new(EqualityMemo::new()), ClassIntrospector)
}

/// Runs a comparison, panicking on a fatal error.
pub fn differences(
    actual: &Value,
    expected: &Value,
    config: &ComparisonConfig,
) -> Vec<ComparisonDifference> {
    calculator()
        .determine_differences(actual, expected, config)
        .expect("comparison succeeds")
}

/// Dotted paths of `differences`, in order.
pub fn paths(differences: &[ComparisonDifference]) -> Vec<String> {
    differences
        .iter()
        .map(ComparisonDifference::concatenated_path)
        .collect()
}
