//! Cycle-safe structural hash used to pre-match unordered elements.
//!
//! The hash is a wrapping sum over every leaf reachable from the root, so it
//! ignores element order and tolerates collisions: a matching hash only
//! nominates a candidate pair, which the calculator then compares in full.
use std::collections::HashSet;

use crate::error::CompareError;
use crate::introspect::FieldIntrospector;
use crate::memo::EqualityMemo;
use crate::value::{Identity, Value};

/// Computes the structural hash of `value`.
///
/// Traversal uses an explicit work list. Containers and objects are visited
/// at most once each, so cyclic graphs terminate. Nulls contribute nothing.
/// Floats are hashed by their rounded integral value. A value whose class
/// declares its own hash contributes that hash and is not decomposed.
///
/// # Errors
///
/// Propagates the introspector's error if a field cannot be read.
pub fn deep_hash<I>(value: &Value, introspector: &I, memo: &EqualityMemo) -> Result<i64, CompareError>
where
    I: FieldIntrospector + ?Sized,
{
    let mut hash: i64 = 0;
    let mut visited: HashSet<Identity> = HashSet::new();
    let mut stack = vec![value.clone()];

    while let Some(current) = stack.pop() {
        if current.is_graph_node() && !visited.insert(current.identity()) {
            continue;
        }
        let current = match current {
            Value::Null => continue,
            Value::Seq(seq) => {
                stack.extend(seq.items());
                continue;
            }
            Value::Map(map) => {
                for (k, v) in map.entries() {
                    stack.push(k);
                    stack.push(v);
                }
                continue;
            }
            Value::Float(x) => Value::Int(x.round() as i64),
            other @ (Value::Bool(_) | Value::Int(_) | Value::Str(_) | Value::Object(_)) => other,
        };
        let Some(class) = current.class() else {
            continue;
        };
        if memo.has_custom_hash(class) {
            if let Some(hash_fn) = class.hash_fn() {
                hash = hash.wrapping_add(hash_fn(&current));
            }
            continue;
        }
        for name in introspector.declared_field_names(class) {
            stack.push(introspector.field_value(&name, &current)?);
        }
    }
    Ok(hash)
}
