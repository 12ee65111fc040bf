//! Field enumeration and field access.
//!
//! The calculator never looks inside an object on its own: it asks a
//! [`FieldIntrospector`] which fields a class declares and what value an
//! instance holds for a given field. [`ClassIntrospector`] answers both from
//! [`Class`] metadata and [`Object`](crate::value::Object) storage.
use std::collections::HashSet;

use crate::class::Class;
use crate::error::CompareError;
use crate::value::Value;

/// Capability to enumerate and read instance fields.
pub trait FieldIntrospector {
    /// All instance field names of `class`, ancestors included, in a stable
    /// order without duplicates.
    fn declared_field_names(&self, class: &Class) -> Vec<String>;

    /// Reads field `name` from `instance`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompareError`] if the field cannot be read. The calculator
    /// aborts the whole comparison on such an error.
    fn field_value(&self, name: &str, instance: &Value) -> Result<Value, CompareError>;
}

/// Introspector backed by [`Class`] metadata.
///
/// Field names are listed own class first, then each ancestor nearest first.
/// A name redeclared by an ancestor is reported once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassIntrospector;

impl FieldIntrospector for ClassIntrospector {
    fn declared_field_names(&self, class: &Class) -> Vec<String> {
        let mut seen = HashSet::new();
        class
            .ancestors()
            .flat_map(Class::declared_fields)
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }

    fn field_value(&self, name: &str, instance: &Value) -> Result<Value, CompareError> {
        let Some(object) = instance.as_object() else {
            return Err(CompareError::NotAnObject {
                field: name.to_owned(),
                found: instance.to_string(),
            });
        };
        object.get(name).ok_or_else(|| CompareError::MissingField {
            class: object.class().name().to_owned(),
            field: name.to_owned(),
        })
    }
}

impl<T: FieldIntrospector + ?Sized> FieldIntrospector for &T {
    fn declared_field_names(&self, class: &Class) -> Vec<String> {
        (**self).declared_field_names(class)
    }

    fn field_value(&self, name: &str, instance: &Value) -> Result<Value, CompareError> {
        (**self).field_value(name, instance)
    }
}
