//! Dynamic object graphs compared by the recursive difference calculator.
//!
//! [`Value`] is a reference-counted graph model: scalars are plain data,
//! while strings, sequences, mappings and object instances live behind
//! [`Rc`] so that two positions in a graph can refer to the *same* instance.
//! Interior mutability ([`RefCell`]) lets callers tie cycles after
//! construction (`a.next = b; b.next = a`).
//!
//! Reference identity is exposed as an [`Identity`] token, used by the
//! calculator's visited set and by the deep hash's cycle guard.
mod convert;
mod display;


use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use crate::class::{self, Class};

/// A node of an object graph.
#[derive(Clone)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar.
    Int(i64),
    /// Double-precision float scalar.
    Float(f64),
    /// Shared immutable string.
    Str(Rc<str>),
    /// Array or collection; see [`SeqKind`].
    Seq(Rc<Sequence>),
    /// Key/value mapping; see [`MapKind`].
    Map(Rc<Mapping>),
    /// Instance of a user [`Class`].
    Object(Rc<Object>),
}

/// Shape of a [`Sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqKind {
    /// Fixed-length array. Not a collection.
    Array,
    /// Ordered collection.
    List,
    /// Unordered collection without duplicates.
    Set,
    /// Collection kept in natural order without duplicates.
    SortedSet,
    /// Unordered collection that may hold duplicates.
    Bag,
}

impl SeqKind {
    /// Returns `true` for every kind except [`SeqKind::Array`].
    pub fn is_collection(self) -> bool {
        match self {
            Self::Array => false,
            Self::List | Self::Set | Self::SortedSet | Self::Bag => true,
        }
    }

    /// Returns `true` when element order is significant for comparison.
    pub fn is_ordered(self) -> bool {
        match self {
            Self::Array | Self::List | Self::SortedSet => true,
            Self::Set | Self::Bag => false,
        }
    }
}

/// Shape of a [`Mapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// Unordered mapping.
    Hash,
    /// Mapping kept in natural key order.
    Sorted,
}

/// Elements of an array or collection.
pub struct Sequence {
    kind: SeqKind,
    items: RefCell<Vec<Value>>,
}

impl Sequence {
    /// Returns the shape of this sequence.
    pub fn kind(&self) -> SeqKind {
        self.kind
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Snapshot of the elements in iteration order.
    pub fn items(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    /// Adds an element, honouring the kind's ordering and uniqueness rules.
    pub fn push(&self, value: Value) {
        let mut items = self.items.borrow_mut();
        match self.kind {
            SeqKind::Array | SeqKind::List | SeqKind::Bag => items.push(value),
            SeqKind::Set => {
                if !items.iter().any(|existing| existing.key_eq(&value)) {
                    items.push(value);
                }
            }
            SeqKind::SortedSet => {
                if items.iter().any(|existing| existing.key_eq(&value)) {
                    return;
                }
                let at = items
                    .iter()
                    .position(|existing| existing.natural_cmp(&value) == Ordering::Greater)
                    .unwrap_or(items.len());
                items.insert(at, value);
            }
        }
    }
}

/// Entries of a mapping.
pub struct Mapping {
    kind: MapKind,
    entries: RefCell<Vec<(Value, Value)>>,
}

impl Mapping {
    /// Returns the shape of this mapping.
    pub fn kind(&self) -> MapKind {
        self.kind
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Snapshot of the entries in iteration order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.borrow().clone()
    }

    /// Inserts or replaces the entry for `key`.
    pub fn insert(&self, key: Value, value: Value) {
        let mut entries = self.entries.borrow_mut();
        if let Some(entry) = entries.iter_mut().find(|(k, _)| k.key_eq(&key)) {
            entry.1 = value;
            return;
        }
        let at = match self.kind {
            MapKind::Hash => entries.len(),
            MapKind::Sorted => entries
                .iter()
                .position(|(k, _)| k.natural_cmp(&key) == Ordering::Greater)
                .unwrap_or(entries.len()),
        };
        entries.insert(at, (key, value));
    }

    /// Looks up the value stored under a key equal to `key`.
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries
            .borrow()
            .iter()
            .find(|(k, _)| k.key_eq(key))
            .map(|(_, v)| v.clone())
    }
}

/// An instance of a [`Class`].
pub struct Object {
    class: Arc<Class>,
    fields: RefCell<BTreeMap<String, Value>>,
}

impl Object {
    /// Creates an instance with every declared field (ancestors included)
    /// set to [`Value::Null`].
    pub fn new(class: &Arc<Class>) -> Self {
        let fields = class
            .ancestors()
            .flat_map(Class::declared_fields)
            .map(|name| (name.clone(), Value::Null))
            .collect();
        Self {
            class: Arc::clone(class),
            fields: RefCell::new(fields),
        }
    }

    /// Returns the runtime class.
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// Reads a field, or `None` if the instance carries no such field.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Writes a field.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.borrow_mut().insert(name.into(), value.into());
    }

    /// Removes a field from the instance entirely.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.fields.borrow_mut().remove(name)
    }

    pub(crate) fn field_snapshot(&self) -> Vec<(String, Value)> {
        self.fields
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Identity token of a value: heap address for shared values, the bit
/// pattern for plain scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    /// [`Value::Null`].
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Int(i64),
    /// A float scalar, by bit pattern.
    Float(u64),
    /// Address of an `Rc` allocation.
    Ref(usize),
}

impl Value {
    // -- constructors -------------------------------------------------------

    /// Creates a string value.
    pub fn str(s: &str) -> Self {
        Self::Str(Rc::from(s))
    }

    fn seq(kind: SeqKind, items: impl IntoIterator<Item = Value>) -> Self {
        let seq = Sequence {
            kind,
            items: RefCell::new(Vec::new()),
        };
        for item in items {
            seq.push(item);
        }
        Self::Seq(Rc::new(seq))
    }

    /// Creates a fixed-length array.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::seq(SeqKind::Array, items)
    }

    /// Creates an ordered list.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::seq(SeqKind::List, items)
    }

    /// Creates an unordered set. Elements equal by [`Value::key_eq`] collapse.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::seq(SeqKind::Set, items)
    }

    /// Creates a set kept in natural order.
    pub fn sorted_set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::seq(SeqKind::SortedSet, items)
    }

    /// Creates an unordered collection that keeps duplicates.
    pub fn bag(items: impl IntoIterator<Item = Value>) -> Self {
        Self::seq(SeqKind::Bag, items)
    }

    fn mapping(kind: MapKind, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let map = Mapping {
            kind,
            entries: RefCell::new(Vec::new()),
        };
        for (k, v) in entries {
            map.insert(k, v);
        }
        Self::Map(Rc::new(map))
    }

    /// Creates an unordered mapping.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::mapping(MapKind::Hash, entries)
    }

    /// Creates a mapping kept in natural key order.
    pub fn sorted_map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::mapping(MapKind::Sorted, entries)
    }

    /// Creates an instance of `class` with the given field values; declared
    /// fields not listed are null.
    pub fn object<'a>(
        class: &Arc<Class>,
        fields: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Self {
        let object = Object::new(class);
        for (name, value) in fields {
            object.set(name, value);
        }
        Self::Object(Rc::new(object))
    }

    // -- accessors ----------------------------------------------------------

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the sequence if this is an array or collection.
    pub fn as_seq(&self) -> Option<&Rc<Sequence>> {
        match self {
            Self::Seq(seq) => Some(seq),
            Self::Null
            | Self::Bool(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::Str(_)
            | Self::Map(_)
            | Self::Object(_) => None,
        }
    }

    /// Returns the mapping if this is a map.
    pub fn as_map(&self) -> Option<&Rc<Mapping>> {
        match self {
            Self::Map(map) => Some(map),
            Self::Null
            | Self::Bool(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::Str(_)
            | Self::Seq(_)
            | Self::Object(_) => None,
        }
    }

    /// Returns the instance if this is an object.
    pub fn as_object(&self) -> Option<&Rc<Object>> {
        match self {
            Self::Object(object) => Some(object),
            Self::Null
            | Self::Bool(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::Str(_)
            | Self::Seq(_)
            | Self::Map(_) => None,
        }
    }

    /// Returns the string contents if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Null
            | Self::Bool(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::Seq(_)
            | Self::Map(_)
            | Self::Object(_) => None,
        }
    }

    /// Returns the integer if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Null
            | Self::Bool(_)
            | Self::Float(_)
            | Self::Str(_)
            | Self::Seq(_)
            | Self::Map(_)
            | Self::Object(_) => None,
        }
    }

    /// Returns the number as `f64` if this is an integer or a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(x) => Some(*x),
            Self::Null
            | Self::Bool(_)
            | Self::Str(_)
            | Self::Seq(_)
            | Self::Map(_)
            | Self::Object(_) => None,
        }
    }

    /// Sets a field on an object value. Returns `false` if this is not an object.
    pub fn set_field(&self, name: &str, value: impl Into<Value>) -> bool {
        match self.as_object() {
            Some(object) => {
                object.set(name, value);
                true
            }
            None => false,
        }
    }

    // -- shape --------------------------------------------------------------

    /// Shape of this value if it is a sequence.
    pub fn seq_kind(&self) -> Option<SeqKind> {
        self.as_seq().map(|seq| seq.kind())
    }

    /// Shape of this value if it is a mapping.
    pub fn map_kind(&self) -> Option<MapKind> {
        self.as_map().map(|map| map.kind())
    }

    /// Returns `true` for arrays.
    pub fn is_array(&self) -> bool {
        self.seq_kind() == Some(SeqKind::Array)
    }

    /// Returns `true` for every sequence except arrays.
    pub fn is_collection(&self) -> bool {
        self.seq_kind().is_some_and(SeqKind::is_collection)
    }

    /// Returns `true` for sorted sets.
    pub fn is_sorted_set(&self) -> bool {
        self.seq_kind() == Some(SeqKind::SortedSet)
    }

    /// Returns `true` for any mapping.
    pub fn is_mapping(&self) -> bool {
        self.as_map().is_some()
    }

    /// Returns `true` for sorted mappings.
    pub fn is_sorted_map(&self) -> bool {
        self.map_kind() == Some(MapKind::Sorted)
    }

    /// Returns `true` for collections and mappings (arrays excluded).
    pub fn is_container(&self) -> bool {
        self.is_collection() || self.is_mapping()
    }

    /// Returns `true` for values that can take part in a reference cycle.
    pub fn is_graph_node(&self) -> bool {
        match self {
            Self::Seq(_) | Self::Map(_) | Self::Object(_) => true,
            Self::Null | Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::Str(_) => false,
        }
    }

    /// Returns the runtime class, or `None` for [`Value::Null`].
    pub fn class(&self) -> Option<&Arc<Class>> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(class::bool_class()),
            Self::Int(_) => Some(class::int_class()),
            Self::Float(_) => Some(class::float_class()),
            Self::Str(_) => Some(class::string_class()),
            Self::Seq(seq) => Some(class::seq_class(seq.kind())),
            Self::Map(map) => Some(class::map_class(map.kind())),
            Self::Object(object) => Some(object.class()),
        }
    }

    // -- identity and built-in semantics ------------------------------------

    /// Returns the identity token of this value.
    pub fn identity(&self) -> Identity {
        match self {
            Self::Null => Identity::Null,
            Self::Bool(b) => Identity::Bool(*b),
            Self::Int(n) => Identity::Int(*n),
            Self::Float(x) => Identity::Float(x.to_bits()),
            Self::Str(s) => Identity::Ref(Rc::as_ptr(s).cast::<()>().addr()),
            Self::Seq(seq) => Identity::Ref(Rc::as_ptr(seq).cast::<()>().addr()),
            Self::Map(map) => Identity::Ref(Rc::as_ptr(map).cast::<()>().addr()),
            Self::Object(object) => Identity::Ref(Rc::as_ptr(object).cast::<()>().addr()),
        }
    }

    /// Returns `true` if both values are the same instance.
    pub fn same_ref(&self, other: &Value) -> bool {
        self.identity() == other.identity()
    }

    /// Equality declared by the built-in scalar classes.
    ///
    /// Floats compare by bit pattern; values of different variants are
    /// never equal.
    pub fn scalar_eq(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Self::Bool(x), Self::Bool(y)) => x == y,
            (Self::Int(x), Self::Int(y)) => x == y,
            (Self::Float(x), Self::Float(y)) => x.to_bits() == y.to_bits(),
            (Self::Str(x), Self::Str(y)) => x == y,
            _ => false,
        }
    }

    /// Hash declared by the built-in scalar classes.
    pub fn scalar_hash(&self) -> i64 {
        match self {
            Self::Null => 0,
            Self::Bool(b) => i64::from(*b),
            Self::Int(n) => *n,
            Self::Float(x) => x.to_bits() as i64,
            Self::Str(s) => {
                let mut hasher = DefaultHasher::new();
                s.hash(&mut hasher);
                hasher.finish() as i64
            }
            Self::Seq(_) | Self::Map(_) | Self::Object(_) => self.identity_hash(),
        }
    }

    fn identity_hash(&self) -> i64 {
        let mut hasher = DefaultHasher::new();
        self.identity().hash(&mut hasher);
        hasher.finish() as i64
    }

    /// Key equality used by sets and mappings: same instance, or equal scalars.
    pub fn key_eq(&self, other: &Value) -> bool {
        self.same_ref(other) || Self::scalar_eq(self, other)
    }

    /// Natural order used by sorted sets and sorted maps.
    ///
    /// `null < bool < number < string < everything else`. Integers and
    /// floats compare numerically with each other. Values outside the scalar
    /// categories compare equal, keeping their insertion order.
    pub fn natural_cmp(&self, other: &Value) -> Ordering {
        let rank = self.order_rank().cmp(&other.order_rank());
        if rank != Ordering::Equal {
            return rank;
        }
        match (self, other) {
            (Self::Bool(x), Self::Bool(y)) => x.cmp(y),
            (Self::Int(x), Self::Int(y)) => x.cmp(y),
            (Self::Str(x), Self::Str(y)) => x.cmp(y),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            },
        }
    }

    fn order_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Str(_) => 3,
            Self::Seq(_) | Self::Map(_) | Self::Object(_) => 4,
        }
    }
}
