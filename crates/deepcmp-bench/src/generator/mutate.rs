//! Targeted edits on generated people, each introducing exactly one
//! difference at a known path.

use deepcmp_core::Value;

/// Renames `person`. Returns the changed path, or `None` if `person` is not
/// an object.
pub fn rename(person: &Value, name: &str) -> Option<&'static str> {
    person.set_field("name", name).then_some("name")
}

/// Moves the address of `person` to `city`.
pub fn relocate(person: &Value, city: &str) -> Option<&'static str> {
    let address = person.as_object()?.get("address")?;
    address.set_field("city", city).then_some("address.city")
}

/// Increments the age of `person`.
pub fn birthday(person: &Value) -> Option<&'static str> {
    let age = person.as_object()?.get("age")?.as_i64()?;
    person.set_field("age", age + 1).then_some("age")
}
