//! Runtime type descriptors for values under comparison.
//!
//! A [`Class`] plays the part that runtime reflection plays in languages that
//! have it: it names a type, links it to its parent (forming an ancestor
//! chain that ends implicitly at the universal base type), lists the fields
//! declared at its own level, and optionally declares its own equality and
//! hash functions.
//!
//! Classes are shared through [`Arc`] and are `Send + Sync`, so the same
//! descriptors (and the [`crate::EqualityMemo`] keyed by them) can serve
//! comparisons running on several threads at once.
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use crate::value::{MapKind, SeqKind, Value};

/// An equality function declared by a class.
pub type EqualsFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// A hash function declared by a class.
pub type HashFn = Arc<dyn Fn(&Value) -> i64 + Send + Sync>;

/// Process-unique identity of a [`Class`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

impl ClassId {
    fn next() -> Self {
        Self(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A runtime type descriptor.
pub struct Class {
    id: ClassId,
    name: String,
    parent: Option<Arc<Class>>,
    fields: Vec<String>,
    equals: Option<EqualsFn>,
    hash: Option<HashFn>,
}

impl Class {
    /// Starts building a class with the given qualified name (e.g. `zoo.Person`).
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            equals: None,
            hash: None,
        }
    }

    /// Returns the process-unique identity of this class.
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Returns the qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name without its dotted qualifier.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Returns the direct parent, or `None` when this class sits directly
    /// below the universal base type.
    pub fn parent(&self) -> Option<&Arc<Class>> {
        self.parent.as_ref()
    }

    /// Fields declared at this level only, in declaration order.
    pub fn declared_fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns `true` if this level declares its own equality.
    pub fn declares_equals(&self) -> bool {
        self.equals.is_some()
    }

    /// Returns `true` if this level declares its own hash.
    pub fn declares_hash(&self) -> bool {
        self.hash.is_some()
    }

    /// Iterates this class followed by its ancestors, nearest first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// The equality function in effect for instances of this class: the one
    /// declared by the nearest level of the ancestor chain, if any.
    pub fn equals_fn(&self) -> Option<&EqualsFn> {
        self.ancestors().find_map(|c| c.equals.as_ref())
    }

    /// The hash function in effect for instances of this class.
    pub fn hash_fn(&self) -> Option<&HashFn> {
        self.ancestors().find_map(|c| c.hash.as_ref())
    }

    /// Returns `true` if `self` is `other` or one of its descendants.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestors().any(|c| c.id == other.id)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("fields", &self.fields)
            .field("declares_equals", &self.declares_equals())
            .field("declares_hash", &self.declares_hash())
            .finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Iterator over a class and its ancestors. See [`Class::ancestors`].
pub struct Ancestors<'a> {
    next: Option<&'a Class>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Class;

    fn next(&mut self) -> Option<&'a Class> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

/// Builder returned by [`Class::builder`].
pub struct ClassBuilder {
    name: String,
    parent: Option<Arc<Class>>,
    fields: Vec<String>,
    equals: Option<EqualsFn>,
    hash: Option<HashFn>,
}

impl ClassBuilder {
    /// Sets the parent class.
    pub fn extends(mut self, parent: &Arc<Class>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Declares one field at this level.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Declares several fields at this level, in order.
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declares an equality function at this level.
    pub fn equals<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.equals = Some(Arc::new(f));
        self
    }

    /// Declares a hash function at this level.
    pub fn hash<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> i64 + Send + Sync + 'static,
    {
        self.hash = Some(Arc::new(f));
        self
    }

    /// Finishes the class, assigning it a fresh [`ClassId`].
    pub fn build(self) -> Arc<Class> {
        Arc::new(Class {
            id: ClassId::next(),
            name: self.name,
            parent: self.parent,
            fields: self.fields,
            equals: self.equals,
            hash: self.hash,
        })
    }
}

// ---------------------------------------------------------------------------
// Built-in classes
// ---------------------------------------------------------------------------

fn scalar_class(name: &str) -> Arc<Class> {
    Class::builder(name)
        .equals(Value::scalar_eq)
        .hash(Value::scalar_hash)
        .build()
}

fn container_class(name: &str) -> Arc<Class> {
    Class::builder(name).build()
}

static BOOL_CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| scalar_class("bool"));
static INT_CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| scalar_class("int"));
static FLOAT_CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| scalar_class("float"));
static STRING_CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| scalar_class("string"));

static ARRAY_CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| container_class("array"));
static LIST_CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| container_class("list"));
static SET_CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| container_class("set"));
static SORTED_SET_CLASS: LazyLock<Arc<Class>> =
    LazyLock::new(|| container_class("sorted_set"));
static BAG_CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| container_class("bag"));
static MAP_CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| container_class("map"));
static SORTED_MAP_CLASS: LazyLock<Arc<Class>> =
    LazyLock::new(|| container_class("sorted_map"));

/// Class of [`Value::Bool`].
pub fn bool_class() -> &'static Arc<Class> {
    &BOOL_CLASS
}

/// Class of [`Value::Int`].
pub fn int_class() -> &'static Arc<Class> {
    &INT_CLASS
}

/// Class of [`Value::Float`].
pub fn float_class() -> &'static Arc<Class> {
    &FLOAT_CLASS
}

/// Class of [`Value::Str`].
pub fn string_class() -> &'static Arc<Class> {
    &STRING_CLASS
}

/// Class of a sequence of the given kind.
pub fn seq_class(kind: SeqKind) -> &'static Arc<Class> {
    match kind {
        SeqKind::Array => &*ARRAY_CLASS,
        SeqKind::List => &*LIST_CLASS,
        SeqKind::Set => &*SET_CLASS,
        SeqKind::SortedSet => &*SORTED_SET_CLASS,
        SeqKind::Bag => &*BAG_CLASS,
    }
}

/// Class of a mapping of the given kind.
pub fn map_class(kind: MapKind) -> &'static Arc<Class> {
    match kind {
        MapKind::Hash => &*MAP_CLASS,
        MapKind::Sorted => &*SORTED_MAP_CLASS,
    }
}
