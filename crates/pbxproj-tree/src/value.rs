//! Value types for project documents.
//!
//! Every value carries the formatting facts the writer needs to reproduce
//! it: a [`Scalar`] remembers how it was quoted, an [`Array`] remembers
//! whether its last element had a trailing comma, a [`Reference`] keeps the
//! comment written after the identifier.
//!
//! - `PBXGroup` is `Value::Scalar(Scalar { raw: "PBXGroup", quote: None })`
//! - `"<group>"` is `Value::Scalar(Scalar { raw: "<group>", quote: Double })`
//! - `29B97316FDCFA39411CA2CEA /* main.m */` is a `Value::Reference`
//! - `( a, b, )` is `Value::Array`, `{ k = v; }` is `Value::Object`

use std::borrow::Cow;

use pbxproj_tokenizer::Quote;

use crate::scalar::{can_be_bare, escape_quoted, unescape_quoted};

/// A value in a field map.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A bare or quoted string.
    Scalar(Scalar),
    /// An object identifier with its optional annotation comment.
    Reference(Reference),
    /// `( ... )`
    Array(Array),
    /// `{ ... }`
    Object(Object),
    /// An absent value. Only ever set programmatically; see `drop_empty_values`.
    Null,
}

/// A string atom with its source quoting style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scalar {
    /// Text as written between the delimiters, escapes left in place.
    /// For bare scalars this is the word itself.
    pub raw: String,
    /// How the scalar is quoted.
    pub quote: Quote,
}

/// An identifier-reference: `ID /* comment */`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// The identifier, normally a bare 24-digit hexadecimal word.
    pub id: Scalar,
    /// The annotation comment, trimmed.
    pub comment: Option<String>,
}

/// An ordered list of values.
#[derive(Debug, Clone, Default)]
pub struct Array {
    /// Items in the array.
    pub items: Vec<Value>,
    /// Whether the last item was followed by a comma in the source.
    /// The writer always emits one; this flag records the source fact.
    pub trailing_comma: bool,
}

/// An ordered field map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    /// Fields in source (or insertion) order.
    pub fields: Vec<Field>,
}

/// A `key = value;` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The key.
    pub key: Key,
    /// The value.
    pub value: Value,
}

/// A field key, with the comment that may follow it (`ID /* comment */ = ...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// The key text.
    pub name: Scalar,
    /// Comment between the key and `=`.
    pub comment: Option<String>,
}

impl Scalar {
    /// A scalar from plain text, quoted only if it cannot be a bare word.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        if can_be_bare(&text) {
            Scalar {
                raw: text,
                quote: Quote::None,
            }
        } else {
            Self::quoted(text)
        }
    }

    /// A double-quoted scalar from plain text, escaping as needed.
    pub fn quoted(text: impl AsRef<str>) -> Self {
        Scalar {
            raw: escape_quoted(text.as_ref(), '"').into_owned(),
            quote: Quote::Double,
        }
    }

    /// A scalar from source text, exactly as written.
    pub fn from_source(raw: impl Into<String>, quote: Quote) -> Self {
        Scalar {
            raw: raw.into(),
            quote,
        }
    }

    /// The text as written, escapes included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The text with escapes resolved.
    pub fn text(&self) -> Cow<'_, str> {
        if self.quote.is_quoted() {
            unescape_quoted(&self.raw)
        } else {
            Cow::Borrowed(&self.raw)
        }
    }

    /// Whether the scalar is quoted.
    pub fn is_quoted(&self) -> bool {
        self.quote.is_quoted()
    }
}

impl Reference {
    /// A reference to `id`, annotated with `comment`.
    pub fn new(id: impl Into<String>, comment: Option<&str>) -> Self {
        Reference {
            id: Scalar::new(id),
            comment: comment.map(str::to_string),
        }
    }

    /// The referenced identifier.
    pub fn id(&self) -> &str {
        self.id.raw()
    }
}

// The comma flag is layout, not content.
impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Array {
    /// An array with the given items.
    pub fn new(items: Vec<Value>) -> Self {
        let trailing_comma = !items.is_empty();
        Array {
            items,
            trailing_comma,
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the array is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item.
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    /// Iterate over the identifiers of reference items.
    pub fn reference_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|v| v.as_reference().map(Reference::id))
    }

    /// Whether the array holds a reference to `id`.
    pub fn contains_reference(&self, id: &str) -> bool {
        self.reference_ids().any(|r| r == id)
    }

    /// Remove every reference to `id`, returning how many were removed.
    pub fn remove_references(&mut self, id: &str) -> usize {
        let before = self.items.len();
        self.items
            .retain(|v| v.as_reference().is_none_or(|r| r.id() != id));
        before - self.items.len()
    }
}

impl Object {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the object has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the field for a key.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key.as_str() == key)
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.field(key).map(|f| &f.value)
    }

    /// Get a mutable value by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|f| f.key.as_str() == key)
            .map(|f| &mut f.value)
    }

    /// Whether the object has a field for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Set a value. An existing field keeps its position; a new one is appended.
    /// Returns the previous value.
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        if let Some(slot) = self.get_mut(key) {
            return Some(std::mem::replace(slot, value));
        }
        self.fields.push(Field {
            key: Key::new(key),
            value,
        });
        None
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.fields.iter().position(|f| f.key.as_str() == key)?;
        Some(self.fields.remove(index).value)
    }

    /// Iterate over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|f| (f.key.as_str(), &f.value))
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }
}

impl Key {
    /// A key from plain text, quoted only if needed.
    pub fn new(name: &str) -> Self {
        Key {
            name: Scalar::new(name),
            comment: None,
        }
    }

    /// The key text as written.
    pub fn as_str(&self) -> &str {
        self.name.raw()
    }
}

impl Value {
    /// A scalar, quoted only if needed.
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(Scalar::new(text))
    }

    /// A double-quoted scalar.
    pub fn quoted(text: impl AsRef<str>) -> Self {
        Value::Scalar(Scalar::quoted(text))
    }

    /// A reference to `id` with an optional comment.
    pub fn reference(id: impl Into<String>, comment: Option<&str>) -> Self {
        Value::Reference(Reference::new(id, comment))
    }

    /// An empty array.
    pub fn empty_array() -> Self {
        Value::Array(Array::default())
    }

    /// An empty object.
    pub fn empty_object() -> Self {
        Value::Object(Object::default())
    }

    /// Check if this is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Raw text of a scalar, or the identifier of a reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s.raw()),
            Value::Reference(r) => Some(r.id()),
            _ => None,
        }
    }

    /// Unescaped text of a scalar, or the identifier of a reference.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Scalar(s) => Some(s.text()),
            Value::Reference(r) => Some(Cow::Borrowed(r.id())),
            _ => None,
        }
    }

    /// Get as scalar.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Get as reference.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Value::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Get as array.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as mutable array.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get as mutable object.
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Name of the variant, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Reference(_) => "reference",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Null => "null",
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::scalar(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::scalar(text)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<Reference> for Value {
    fn from(reference: Reference) -> Self {
        Value::Reference(reference)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_new_quotes_only_when_needed() {
        assert_eq!(Scalar::new("main.m").quote, Quote::None);
        let spaced = Scalar::new("My App");
        assert_eq!(spaced.quote, Quote::Double);
        assert_eq!(spaced.raw(), "My App");
        let tricky = Scalar::new("say \"hi\"");
        assert_eq!(tricky.raw(), "say \\\"hi\\\"");
        assert_eq!(tricky.text(), "say \"hi\"");
    }

    #[test]
    fn test_object_insert_keeps_position() {
        let mut obj = Object::new()
            .with("isa", "PBXGroup")
            .with("name", "Sources")
            .with("sourceTree", Value::quoted("<group>"));
        let previous = obj.insert("name", "Classes".into());
        assert_eq!(previous.and_then(|v| v.as_str().map(str::to_string)), Some("Sources".into()));
        let keys: Vec<_> = obj.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["isa", "name", "sourceTree"]);
        assert_eq!(obj.get("name").and_then(Value::as_str), Some("Classes"));
    }

    #[test]
    fn test_object_remove() {
        let mut obj = Object::new().with("a", "1").with("b", "2");
        assert!(obj.remove("a").is_some());
        assert!(obj.remove("a").is_none());
        assert_eq!(obj.len(), 1);
    }

    #[test]
    fn test_array_reference_helpers() {
        let mut array = Array::new(vec![
            Value::reference("29B97316FDCFA39411CA2CEA", Some("main.m")),
            Value::scalar("plain"),
            Value::reference("1D60589B0D05DD56006BFB54", None),
        ]);
        assert!(array.contains_reference("29B97316FDCFA39411CA2CEA"));
        assert_eq!(array.remove_references("29B97316FDCFA39411CA2CEA"), 1);
        assert_eq!(array.len(), 2);
        assert!(!array.contains_reference("29B97316FDCFA39411CA2CEA"));
    }

    #[test]
    fn test_option_into_value() {
        let none: Option<&str> = None;
        assert!(Value::from(none).is_null());
        assert_eq!(Value::from(Some("x")).as_str(), Some("x"));
    }
}
