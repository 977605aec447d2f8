//! `Value` — Uniform view over scalars and keyed containers
//!
//! Every value the matcher sees is either a scalar or a [`Container`]: an
//! insertion-ordered mapping from [`Key`] to child. Containers come in two
//! kinds that the matcher treats uniformly:
//!
//! - [`Kind::Array`] — ordered array, integer-keyed (a list) or string-keyed (a map)
//! - [`Kind::Object`] — named field bag, optionally an instance of a registered [`Class`]
//!
//! The kind is carried through every same-shaped reconstruction
//! ([`Container::map`]) so results keep the shape of their input.

use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::Class;

// ═══════════════════════════════════════════════════════════════════════════════
// Key & Path
// ═══════════════════════════════════════════════════════════════════════════════

/// Address of a child within its container: an index or a field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Integer position.
    Index(i64),
    /// String field name.
    Name(String),
}

impl Key {
    /// The key as a matchable scalar value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Index(i) => Value::Int(*i),
            Self::Name(s) => Value::String(s.clone()),
        }
    }

    /// Returns the index, if this is an integer key.
    #[must_use]
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Name(_) => None,
        }
    }

    /// Returns the field name, if this is a string key.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Index(_) => None,
            Self::Name(s) => Some(s),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Self::Index(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Self::Index(i64::from(i))
    }
}

impl From<usize> for Key {
    #[allow(clippy::cast_possible_wrap)]
    fn from(i: usize) -> Self {
        Self::Index(i as i64)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Name(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}

/// The traversed key path of a value, root first.
///
/// The root value has an empty path. Dispatch tables that descend into
/// containers extend the path one [`Key`] per level, so key-aware specs
/// (see [`k`](crate::k)) can test where a value sits, not just what it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Key>);

impl Path {
    /// The empty path of a root value.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from its segments.
    pub fn new<K: Into<Key>>(segments: impl IntoIterator<Item = K>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The path of the child stored under `key`.
    #[must_use]
    pub fn child(&self, key: Key) -> Self {
        let mut segments = self.0.clone();
        segments.push(key);
        Self(segments)
    }

    /// The path segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[Key] {
        &self.0
    }

    /// The innermost key, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Key> {
        self.0.last()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The path as a matchable value.
    ///
    /// - root → `Null`
    /// - one segment → that key as a scalar
    /// - several segments → a list of scalar keys
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self.0.as_slice() {
            [] => Value::Null,
            [key] => key.to_value(),
            keys => Value::list(keys.iter().map(Key::to_value)),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl From<Key> for Path {
    fn from(key: Key) -> Self {
        Self(vec![key])
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Container
// ═══════════════════════════════════════════════════════════════════════════════

/// What sort of container a [`Container`] is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Kind {
    /// Ordered array: a list when keyed `0..n`, a map otherwise.
    #[default]
    Array,
    /// Named field bag, optionally an instance of a registered class.
    Object(Option<Rc<Class>>),
}

/// An insertion-ordered mapping from [`Key`] to `T`.
///
/// `Container<Value>` is the container variant of [`Value`];
/// `Container<Either>` is the shape-preserving payload of a container check.
#[derive(Debug, Clone, PartialEq)]
pub struct Container<T> {
    kind: Kind,
    entries: IndexMap<Key, T>,
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self::array()
    }
}

impl<T> Container<T> {
    /// Create an empty container of the given kind.
    #[must_use]
    pub fn with_kind(kind: Kind) -> Self {
        Self {
            kind,
            entries: IndexMap::new(),
        }
    }

    /// Create an empty array.
    #[must_use]
    pub fn array() -> Self {
        Self::with_kind(Kind::Array)
    }

    /// Create an empty field bag.
    #[must_use]
    pub fn object(class: Option<Rc<Class>>) -> Self {
        Self::with_kind(Kind::Object(class))
    }

    /// Create a list keyed `0..n`.
    pub fn list(items: impl IntoIterator<Item = T>) -> Self {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (Key::from(i), item))
            .collect()
    }

    /// The container kind.
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// The class of an object, if it has one.
    #[must_use]
    pub fn class(&self) -> Option<&Rc<Class>> {
        match &self.kind {
            Kind::Object(class) => class.as_ref(),
            Kind::Array => None,
        }
    }

    /// Returns `true` for field bags.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.kind, Kind::Object(_))
    }

    /// Returns `true` for arrays keyed exactly `0..n` in order.
    #[must_use]
    pub fn is_list(&self) -> bool {
        !self.is_object()
            && self
                .entries
                .keys()
                .enumerate()
                .all(|(i, key)| *key == Key::from(i))
    }

    /// Insert an entry, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<Key>, value: T) -> Option<T> {
        self.entries.insert(key.into(), value)
    }

    /// Add an entry (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<Key>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a child by key.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&T> {
        self.entries.get(key)
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, T> {
        self.entries.iter()
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, T> {
        self.entries.keys()
    }

    /// Iterate children in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Key, T> {
        self.entries.values()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild a same-shaped container from transformed entries.
    ///
    /// Keys, order and kind are preserved; only the children change.
    pub fn map<U>(&self, mut f: impl FnMut(&Key, &T) -> U) -> Container<U> {
        Container {
            kind: self.kind.clone(),
            entries: self
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), f(key, value)))
                .collect(),
        }
    }
}

impl<T> FromIterator<(Key, T)> for Container<T> {
    fn from_iter<I: IntoIterator<Item = (Key, T)>>(iter: I) -> Self {
        Self {
            kind: Kind::Array,
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Container<T> {
    type Item = (&'a Key, &'a T);
    type IntoIter = indexmap::map::Iter<'a, Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T> IntoIterator for Container<T> {
    type Item = (Key, T);
    type IntoIter = indexmap::map::IntoIter<Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Value
// ═══════════════════════════════════════════════════════════════════════════════

/// A dynamically shaped value.
///
/// Equality is strict: `Int(1)` and `Float(1.0)` differ, and so do `"1"` and `1`.
///
/// # Example
///
/// ```
/// use patma::{Key, Value};
///
/// let record = Value::map([("name", Value::from("alice")), ("age", Value::from(31))]);
/// let container = record.as_container().unwrap();
/// assert_eq!(container.get(&Key::from("name")), Some(&Value::from("alice")));
/// assert!(!container.is_list());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent or null.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    String(String),
    /// Array or field bag.
    Container(Container<Value>),
}

impl Value {
    /// Build a list keyed `0..n`.
    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::Container(Container::list(items.into_iter().map(Into::into)))
    }

    /// Build an ordered array from `(key, value)` pairs.
    pub fn map<K: Into<Key>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::Container(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Build an anonymous field bag from `(field, value)` pairs.
    pub fn object<K: Into<Key>, V: Into<Value>>(fields: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut bag = Container::object(None);
        for (key, value) in fields {
            bag.insert(key, value.into());
        }
        Self::Container(bag)
    }

    /// Returns `true` for `Null`.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for arrays and field bags.
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as a float. Integers are widened.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a container.
    #[inline]
    #[must_use]
    pub fn as_container(&self) -> Option<&Container<Value>> {
        match self {
            Self::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Returns a string describing the type of this value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Container(c) if c.is_object() => "object",
            Self::Container(_) => "array",
        }
    }

    /// The same-shaped all-null complement of this value.
    ///
    /// Scalars become `Null`; containers keep their keys with every leaf nulled.
    #[must_use]
    pub fn nullish(&self) -> Self {
        match self {
            Self::Container(c) => Self::Container(c.map(|_, child| child.nullish())),
            _ => Self::Null,
        }
    }

    /// Order two values, if they are comparable.
    ///
    /// Numbers compare across `Int`/`Float`, strings lexicographically and
    /// booleans `false < true`. Everything else is incomparable.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Container(c) => {
                f.write_str("[")?;
                for (i, (key, value)) in c.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        key.to_value()
    }
}

impl From<Container<Value>> for Value {
    fn from(c: Container<Value>) -> Self {
        Self::Container(c)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON interop (feature = "serde")
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "serde")]
mod json {
    use super::{Container, Key, Value};
    use serde::ser::{SerializeMap, SerializeSeq};

    /// JSON arrays become lists; JSON objects become string-keyed arrays.
    impl From<serde_json::Value> for Value {
        fn from(json: serde_json::Value) -> Self {
            match json {
                serde_json::Value::Null => Self::Null,
                serde_json::Value::Bool(b) => Self::Bool(b),
                serde_json::Value::Number(n) => n
                    .as_i64()
                    .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
                serde_json::Value::String(s) => Self::String(s),
                serde_json::Value::Array(items) => {
                    Self::Container(Container::list(items.into_iter().map(Self::from)))
                }
                serde_json::Value::Object(fields) => Self::Container(
                    fields
                        .into_iter()
                        .map(|(name, value)| (Key::Name(name), Self::from(value)))
                        .collect(),
                ),
            }
        }
    }

    /// Lists become JSON arrays; every other container becomes a JSON object
    /// with stringified keys. Non-finite floats become `null`.
    impl From<&Value> for serde_json::Value {
        fn from(value: &Value) -> Self {
            match value {
                Value::Null => Self::Null,
                Value::Bool(b) => Self::Bool(*b),
                Value::Int(i) => Self::from(*i),
                Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Self::Null, Self::Number),
                Value::String(s) => Self::String(s.clone()),
                Value::Container(c) if c.is_list() => Self::Array(c.values().map(Self::from).collect()),
                Value::Container(c) => Self::Object(
                    c.iter()
                        .map(|(key, child)| (key.to_string(), Self::from(child)))
                        .collect(),
                ),
            }
        }
    }

    impl<T: serde::Serialize> serde::Serialize for Container<T> {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if self.is_list() {
                let mut seq = serializer.serialize_seq(Some(self.len()))?;
                for child in self.values() {
                    seq.serialize_element(child)?;
                }
                seq.end()
            } else {
                let mut map = serializer.serialize_map(Some(self.len()))?;
                for (key, child) in self {
                    map.serialize_entry(&key.to_string(), child)?;
                }
                map.end()
            }
        }
    }

    impl serde::Serialize for Value {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Null => serializer.serialize_unit(),
                Self::Bool(b) => serializer.serialize_bool(*b),
                Self::Int(i) => serializer.serialize_i64(*i),
                Self::Float(f) => serializer.serialize_f64(*f),
                Self::String(s) => serializer.serialize_str(s),
                Self::Container(c) => c.serialize(serializer),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_keyed_from_zero() {
        let list = Value::list(["a", "b"]);
        let c = list.as_container().unwrap();
        assert!(c.is_list());
        assert_eq!(c.get(&Key::Index(1)), Some(&Value::from("b")));
    }

    #[test]
    fn test_sparse_array_is_not_a_list() {
        let sparse = Value::map([(2, "C")]);
        assert!(!sparse.as_container().unwrap().is_list());
    }

    #[test]
    fn test_object_is_never_a_list() {
        let bag = Value::object([(0, "x")]);
        let c = bag.as_container().unwrap();
        assert!(c.is_object());
        assert!(!c.is_list());
        assert_eq!(bag.type_name(), "object");
    }

    #[test]
    fn test_map_preserves_keys_and_kind() {
        let bag = Container::object(None).with("a", 1).with("b", 2);
        let doubled = bag.map(|_, v: &i32| v * 2);
        assert!(doubled.is_object());
        assert_eq!(doubled.keys().cloned().collect::<Vec<_>>(), vec![Key::from("a"), Key::from("b")]);
        assert_eq!(doubled.get(&Key::from("b")), Some(&4));
    }

    #[test]
    fn test_nullish_keeps_shape() {
        let value = Value::list([Value::from(1), Value::map([("x", 2)])]);
        assert_eq!(
            value.nullish(),
            Value::list([Value::Null, Value::map([("x", Value::Null)])])
        );
        assert_eq!(Value::from("scalar").nullish(), Value::Null);
    }

    #[test]
    fn test_strict_equality() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::from("1"), Value::from(1));
        assert_eq!(Value::list([1, 2]), Value::list([1, 2]));
    }

    #[test]
    fn test_compare_numbers_across_types() {
        assert_eq!(Value::Int(2).compare(&Value::Float(1.5)), Some(Ordering::Greater));
        assert_eq!(Value::from("a").compare(&Value::from("b")), Some(Ordering::Less));
        assert_eq!(Value::from("a").compare(&Value::Int(1)), None);
    }

    #[test]
    fn test_path_to_value() {
        assert_eq!(Path::root().to_value(), Value::Null);
        assert_eq!(Path::new(["a"]).to_value(), Value::from("a"));
        assert_eq!(Path::new(["b", "c"]).to_value(), Value::list(["b", "c"]));
    }

    #[test]
    fn test_path_child_and_display() {
        let path = Path::root().child(Key::from("b")).child(Key::from(2));
        assert_eq!(path.len(), 2);
        assert_eq!(path.last(), Some(&Key::Index(2)));
        assert_eq!(path.to_string(), "b/2");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_round_trip_shapes() {
        let json = serde_json::json!({"a": [1, 2.5, null], "b": {"c": true}});
        let value = Value::from(json.clone());
        let c = value.as_container().unwrap();
        assert!(!c.is_list());
        assert!(c.get(&Key::from("a")).unwrap().as_container().unwrap().is_list());
        assert_eq!(serde_json::Value::from(&value), json);
        assert_eq!(serde_json::to_value(&value).unwrap(), json);
    }
}
