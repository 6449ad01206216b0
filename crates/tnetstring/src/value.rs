//! [`Value`] — the tagged-variant tree every tagged netstring maps onto.
//!
//! A value is exactly one of seven kinds. The two recursive kinds own their
//! children outright, so a value is always a tree and `Clone` is a deep copy.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

use crate::encoder::format_float;
use crate::error::ValueError;

/// The kind of a [`Value`], one per wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Integer,
    Float,
    Boolean,
    Null,
    Object,
    Array,
}

impl Kind {
    /// The type tag byte written after the payload.
    pub fn tag(self) -> u8 {
        match self {
            Kind::String => b',',
            Kind::Integer => b'#',
            Kind::Float => b'^',
            Kind::Boolean => b'!',
            Kind::Null => b'~',
            Kind::Object => b'}',
            Kind::Array => b']',
        }
    }

    /// Map a tag byte back to its kind, `None` for unknown tags.
    pub fn from_tag(tag: u8) -> Option<Kind> {
        match tag {
            b',' => Some(Kind::String),
            b'#' => Some(Kind::Integer),
            b'^' => Some(Kind::Float),
            b'!' => Some(Kind::Boolean),
            b'~' => Some(Kind::Null),
            b'}' => Some(Kind::Object),
            b']' => Some(Kind::Array),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
            Kind::Object => "object",
            Kind::Array => "array",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One key/value pair of an object. Keys are raw bytes.
pub type Field = (Vec<u8>, Value);

/// A decoded (or hand-built) tagged netstring value.
///
/// # Example
///
/// ```
/// use tnetstring::Value;
///
/// let mut obj = Value::object();
/// obj.push_field("hi", Value::from(vec![Value::from("a"), Value::from("b")]));
/// obj.set_field("count", Value::integer(2));
/// assert_eq!(obj.len(), 2);
/// assert_eq!(obj.field("count").map(|v| v.get_integer(0)), Some(2));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Raw bytes, no charset assumed.
    String(Vec<u8>),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    /// Ordered pairs in insertion order. Duplicate keys may coexist.
    Object(Vec<Field>),
    Array(Vec<Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

// ── Constructors ──────────────────────────────────────────────────────────

impl Value {
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Value::String(bytes.into())
    }

    pub fn integer(n: i64) -> Self {
        Value::Integer(n)
    }

    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    pub fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    pub fn null() -> Self {
        Value::Null
    }

    /// An empty object.
    pub fn object() -> Self {
        Value::Object(Vec::new())
    }

    /// An empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Boolean(_) => Kind::Boolean,
            Value::Null => Kind::Null,
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
        }
    }
}

// ── Accessors ─────────────────────────────────────────────────────────────

impl Value {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(b) => Some(b),
            _ => None,
        }
    }

    /// The string payload as UTF-8, `None` if not a string or not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&[Field]> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The string payload, or `default` for any other kind.
    pub fn get_string<'a>(&'a self, default: &'a [u8]) -> &'a [u8] {
        self.as_bytes().unwrap_or(default)
    }

    pub fn get_integer(&self, default: i64) -> i64 {
        self.as_integer().unwrap_or(default)
    }

    pub fn get_float(&self, default: f64) -> f64 {
        self.as_float().unwrap_or(default)
    }

    pub fn get_boolean(&self, default: bool) -> bool {
        self.as_boolean().unwrap_or(default)
    }

    pub fn get_fields<'a>(&'a self, default: &'a [Field]) -> &'a [Field] {
        self.as_fields().unwrap_or(default)
    }

    pub fn get_elements<'a>(&'a self, default: &'a [Value]) -> &'a [Value] {
        self.as_elements().unwrap_or(default)
    }

    /// Byte count for strings, pair count for objects, element count for
    /// arrays, zero for everything else.
    pub fn len(&self) -> usize {
        match self {
            Value::String(b) => b.len(),
            Value::Object(fields) => fields.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First value stored under `name`, or `None` if absent or not an object.
    pub fn field(&self, name: impl AsRef<[u8]>) -> Option<&Value> {
        let name = name.as_ref();
        self.as_fields()?
            .iter()
            .find(|(k, _)| k.as_slice() == name)
            .map(|(_, v)| v)
    }

    pub fn field_mut(&mut self, name: impl AsRef<[u8]>) -> Option<&mut Value> {
        let name = name.as_ref();
        match self {
            Value::Object(fields) => fields
                .iter_mut()
                .find(|(k, _)| k.as_slice() == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Array element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if this is not an array or `index` is out of range.
    #[track_caller]
    pub fn element(&self, index: usize) -> &Value {
        &self.array_ref("element")[index]
    }

    /// # Panics
    ///
    /// Panics if this is not an array or `index` is out of range.
    #[track_caller]
    pub fn element_mut(&mut self, index: usize) -> &mut Value {
        &mut self.array_mut("element_mut")[index]
    }
}

// ── Mutators ──────────────────────────────────────────────────────────────

impl Value {
    /// Append an element to an array.
    ///
    /// # Panics
    ///
    /// Panics if this is not an array.
    #[track_caller]
    pub fn push(&mut self, value: Value) {
        self.array_mut("push").push(value);
    }

    /// Append a pair to an object without looking for an existing key.
    ///
    /// This is the fast path; keeping keys unique is up to the caller. Use
    /// [`set_field`](Value::set_field) to replace instead.
    ///
    /// # Panics
    ///
    /// Panics if this is not an object.
    #[track_caller]
    pub fn push_field(&mut self, key: impl Into<Vec<u8>>, value: Value) {
        self.object_mut("push_field").push((key.into(), value));
    }

    /// Replace the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if this is not an array or `index` is out of range.
    #[track_caller]
    pub fn set_element(&mut self, index: usize, value: Value) {
        self.array_mut("set_element")[index] = value;
    }

    /// Replace the first pair stored under `key`, or append one if absent.
    ///
    /// # Panics
    ///
    /// Panics if this is not an object.
    #[track_caller]
    pub fn set_field(&mut self, key: impl AsRef<[u8]>, value: Value) {
        let key = key.as_ref();
        let fields = self.object_mut("set_field");
        match fields.iter_mut().find(|(k, _)| k.as_slice() == key) {
            Some(slot) => slot.1 = value,
            None => fields.push((key.to_vec(), value)),
        }
    }

    /// Remove the first pair stored under `key`, keeping the order of the rest.
    ///
    /// # Panics
    ///
    /// Panics if this is not an object.
    #[track_caller]
    pub fn remove_field(&mut self, key: impl AsRef<[u8]>) -> Result<Value, ValueError> {
        let key = key.as_ref();
        let fields = self.object_mut("remove_field");
        let pos = fields
            .iter()
            .position(|(k, _)| k.as_slice() == key)
            .ok_or_else(|| ValueError::KeyNotFound(key.to_vec()))?;
        Ok(fields.remove(pos).1)
    }
}

// ── Iteration ─────────────────────────────────────────────────────────────

impl Value {
    /// # Panics
    ///
    /// Panics if this is not an array.
    #[track_caller]
    pub fn elements(&self) -> std::slice::Iter<'_, Value> {
        self.array_ref("elements").iter()
    }

    /// # Panics
    ///
    /// Panics if this is not an array.
    #[track_caller]
    pub fn elements_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.array_mut("elements_mut").iter_mut()
    }

    /// Pairs in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if this is not an object.
    #[track_caller]
    pub fn fields(&self) -> impl Iterator<Item = (&[u8], &Value)> {
        self.object_ref("fields")
            .iter()
            .map(|(k, v)| (k.as_slice(), v))
    }

    /// # Panics
    ///
    /// Panics if this is not an object.
    #[track_caller]
    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&[u8], &mut Value)> {
        self.object_mut("fields_mut")
            .iter_mut()
            .map(|(k, v)| (k.as_slice(), v))
    }

    #[track_caller]
    fn array_ref(&self, op: &str) -> &Vec<Value> {
        match self {
            Value::Array(items) => items,
            other => other.wrong_kind(op, Kind::Array),
        }
    }

    #[track_caller]
    fn array_mut(&mut self, op: &str) -> &mut Vec<Value> {
        match self {
            Value::Array(items) => items,
            other => other.wrong_kind(op, Kind::Array),
        }
    }

    #[track_caller]
    fn object_ref(&self, op: &str) -> &Vec<Field> {
        match self {
            Value::Object(fields) => fields,
            other => other.wrong_kind(op, Kind::Object),
        }
    }

    #[track_caller]
    fn object_mut(&mut self, op: &str) -> &mut Vec<Field> {
        match self {
            Value::Object(fields) => fields,
            other => other.wrong_kind(op, Kind::Object),
        }
    }

    #[track_caller]
    fn wrong_kind(&self, op: &str, expected: Kind) -> ! {
        panic!("{op}() called on {} value, expected {expected}", self.kind())
    }
}

// ── Equality, hashing, display ────────────────────────────────────────────

// Floats compare by bit pattern so that `Eq` and `Hash` stay lawful.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(b) => b.hash(state),
            Value::Integer(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Null => {}
            Value::Object(fields) => fields.hash(state),
            Value::Array(items) => items.hash(state),
        }
    }
}

/// Human-readable rendering. Not the wire format; see [`encode`](crate::encode).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(fields) => {
                f.write_str("{")?;
                for (i, (key, val)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {val}", String::from_utf8_lossy(key))?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Index<usize> for Value {
    type Output = Value;

    #[track_caller]
    fn index(&self, index: usize) -> &Value {
        self.element(index)
    }
}

impl IndexMut<usize> for Value {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut Value {
        self.element_mut(index)
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::String(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::String(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_kind_tags() {
        for kind in [
            Kind::String,
            Kind::Integer,
            Kind::Float,
            Kind::Boolean,
            Kind::Null,
            Kind::Object,
            Kind::Array,
        ] {
            assert_eq!(Kind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(Kind::from_tag(b'*'), None);
    }

    #[test]
    fn test_accessor_defaults() {
        let s = Value::string("hi");
        assert_eq!(s.get_string(b"nope"), b"hi");
        assert_eq!(s.get_integer(-1), -1);
        assert_eq!(s.get_float(0.5), 0.5);
        assert!(s.get_boolean(true));
        assert!(s.get_fields(&[]).is_empty());
        assert!(s.get_elements(&[]).is_empty());

        assert_eq!(Value::integer(7).get_string(b"nope"), b"nope");
        assert_eq!(Value::integer(7).get_integer(0), 7);
        assert_eq!(Value::float(1.5).get_float(0.0), 1.5);
        assert!(!Value::boolean(false).get_boolean(true));
    }

    #[test]
    fn test_len() {
        assert_eq!(Value::string("abc").len(), 3);
        assert_eq!(Value::integer(12345).len(), 0);
        assert_eq!(Value::null().len(), 0);
        assert_eq!(Value::from(vec![Value::null(), Value::null()]).len(), 2);

        let mut obj = Value::object();
        assert!(obj.is_empty());
        obj.push_field("a", Value::null());
        assert_eq!(obj.len(), 1);
    }

    #[test]
    fn test_field_lookup_first_match() {
        let mut obj = Value::object();
        obj.push_field("k", Value::integer(1));
        obj.push_field("k", Value::integer(2));
        assert_eq!(obj.field("k"), Some(&Value::integer(1)));
        assert_eq!(obj.field("missing"), None);
        assert_eq!(Value::array().field("k"), None);

        if let Some(v) = obj.field_mut("k") {
            *v = Value::integer(10);
        }
        assert_eq!(obj.field("k"), Some(&Value::integer(10)));
        assert_eq!(obj.len(), 2);
    }

    #[test]
    fn test_set_field_dedupes() {
        let mut obj = Value::object();
        obj.push_field("yo", Value::integer(1));
        obj.push_field("yep", Value::integer(2));
        obj.set_field("more", Value::integer(1));
        obj.set_field("yo", Value::integer(1));
        assert_eq!(obj.len(), 3);

        obj.set_field("yep", Value::string("changed"));
        assert_eq!(obj.len(), 3);
        assert_eq!(obj.field("yep").and_then(Value::as_str), Some("changed"));
    }

    #[test]
    fn test_remove_field() {
        let mut obj = Value::object();
        obj.push_field("a", Value::integer(1));
        obj.push_field("b", Value::integer(2));
        obj.push_field("c", Value::integer(3));

        assert_eq!(obj.remove_field("b"), Ok(Value::integer(2)));
        let keys: Vec<&[u8]> = obj.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"a".as_slice(), b"c".as_slice()]);

        assert_eq!(
            obj.remove_field("b"),
            Err(ValueError::KeyNotFound(b"b".to_vec()))
        );
    }

    #[test]
    fn test_array_mutation() {
        let mut arr = Value::array();
        for i in 1..=10 {
            arr.push(Value::integer(i));
        }
        arr.set_element(6, Value::string("yep"));
        assert_eq!(arr.len(), 10);
        assert_eq!(arr.element(4).get_integer(0), 5);
        assert_eq!(arr.element(6).get_string(b""), b"yep");
        assert_eq!(arr[0], Value::integer(1));

        arr[1] = Value::null();
        assert!(arr.element(1).is_null());

        for item in arr.elements_mut() {
            if let Value::Integer(n) = item {
                *n *= 2;
            }
        }
        assert_eq!(arr.element(9).get_integer(0), 20);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_element_out_of_range() {
        let arr = Value::from(vec![Value::null()]);
        let _ = arr.element(1);
    }

    #[test]
    #[should_panic(expected = "push() called on string value, expected array")]
    fn test_push_wrong_kind() {
        let mut s = Value::string("x");
        s.push(Value::null());
    }

    #[test]
    #[should_panic(expected = "fields() called on array value")]
    fn test_fields_wrong_kind() {
        let arr = Value::array();
        let _ = arr.fields().count();
    }

    #[test]
    fn test_fields_mut() {
        let mut obj = Value::object();
        obj.push_field("a", Value::integer(1));
        obj.push_field("b", Value::integer(2));
        for (_, v) in obj.fields_mut() {
            *v = Value::boolean(true);
        }
        assert!(obj.fields().all(|(_, v)| v.get_boolean(false)));
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut inner = Value::array();
        inner.push(Value::integer(1));
        let mut original = Value::object();
        original.push_field("list", inner);

        let mut copy = original.clone();
        assert_eq!(copy, original);

        if let Some(list) = copy.field_mut("list") {
            list.push(Value::integer(2));
        }
        assert_ne!(copy, original);
        assert_eq!(original.field("list").map(Value::len), Some(1));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let mut a = Value::object();
        a.push_field("x", Value::integer(1));
        a.push_field("y", Value::integer(2));
        let mut b = Value::object();
        b.push_field("y", Value::integer(2));
        b.push_field("x", Value::integer(1));
        assert_ne!(a, b);

        assert_ne!(Value::integer(1), Value::float(1.0));
        assert_ne!(Value::string(""), Value::null());
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        let a: Value = vec![Value::from("a"), Value::from(1.5), Value::null()].into();
        let b = a.clone();
        assert_eq!(hash_of(&a), hash_of(&b));

        assert_eq!(Value::float(f64::NAN), Value::float(f64::NAN));
        assert_eq!(hash_of(&Value::float(f64::NAN)), hash_of(&Value::float(f64::NAN)));
        assert_ne!(Value::float(0.0), Value::float(-0.0));
    }

    #[test]
    fn test_display() {
        let mut obj = Value::object();
        obj.push_field("hi", vec![Value::from("a"), Value::from("b")].into());
        obj.push_field("n", Value::integer(-3));
        obj.push_field("f", Value::float(2.0));
        obj.push_field("ok", Value::boolean(true));
        obj.push_field("nil", Value::null());
        assert_eq!(
            obj.to_string(),
            "{hi: [a, b], n: -3, f: 2.0, ok: true, nil: null}"
        );
    }

    #[test]
    fn test_from_iterator() {
        let arr: Value = (1..=3).map(Value::integer).collect();
        assert_eq!(arr.kind(), Kind::Array);
        assert_eq!(arr.len(), 3);
    }
}
