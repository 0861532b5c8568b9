//! Conversion between backend documents and typed service specifications.
//!
//! The backend stores specifications as loosely typed JSON objects. Decoding is
//! explicit: each typed specification implements [`Decode`] and reads its fields
//! through [`Fields`], which matches keys case-insensitively, treats missing keys
//! as zero values and reports type mismatches with the full field path.
//! Encoding goes through serde, so the typed structs define the canonical wire shape.

use crate::error::ServiceError;
use crate::question::MenuChoice;
use serde::Serialize;
use serde_json::{Map, Value};

/// Untyped document as stored and transported by the backend
pub type Document = Map<String, Value>;

/// Types that can be decoded from an untyped document
pub trait Decode: Sized {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError>;
}

/// Decode a whole document into a typed specification
pub fn decode<T: Decode>(document: &Document) -> Result<T, ServiceError> {
    T::decode(&Fields::root(document))
}

/// Encode a typed specification into its canonical document form
pub fn encode<T: Serialize>(value: &T) -> anyhow::Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("expected an object, got {}", type_name(&other)),
    }
}

/// Read-only view over one object level of a document
pub struct Fields<'a> {
    map: Option<&'a Map<String, Value>>,
    path: String,
}

impl<'a> Fields<'a> {
    pub fn root(document: &'a Document) -> Self {
        Self {
            map: Some(document),
            path: String::new(),
        }
    }

    fn empty(path: String) -> Self {
        Self { map: None, path }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Exact key first, then the first case-insensitive match. Null counts as absent.
    fn lookup(&self, key: &str) -> Option<&'a Value> {
        let map = self.map?;
        let value = map.get(key).or_else(|| {
            map.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })?;
        if value.is_null() { None } else { Some(value) }
    }

    fn mismatch(&self, key: &str, expected: &'static str, found: &Value) -> ServiceError {
        ServiceError::SchemaMismatch {
            path: self.child_path(key),
            expected,
            found: type_name(found).to_string(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn bool(&self, key: &str) -> Result<bool, ServiceError> {
        match self.lookup(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(self.mismatch(key, "boolean", other)),
        }
    }

    pub fn string(&self, key: &str) -> Result<String, ServiceError> {
        match self.lookup(key) {
            None => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.mismatch(key, "string", other)),
        }
    }

    /// Unsigned integer; integral floats are accepted since JSON does not distinguish them
    pub fn uint(&self, key: &str) -> Result<u64, ServiceError> {
        match self.lookup(key) {
            None => Ok(0),
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                        .map(|f| f as u64)
                })
                .ok_or_else(|| self.mismatch(key, "unsigned integer", &Value::Number(n.clone()))),
            Some(other) => Err(self.mismatch(key, "unsigned integer", other)),
        }
    }

    /// Nested object; a missing key yields an empty view
    pub fn object(&self, key: &str) -> Result<Fields<'a>, ServiceError> {
        Ok(self
            .optional_object(key)?
            .unwrap_or_else(|| Fields::empty(self.child_path(key))))
    }

    pub fn optional_object(&self, key: &str) -> Result<Option<Fields<'a>>, ServiceError> {
        match self.lookup(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Fields {
                map: Some(map),
                path: self.child_path(key),
            })),
            Some(other) => Err(self.mismatch(key, "object", other)),
        }
    }

    /// Decode a nested typed value, treating a missing key as an empty object
    pub fn decode<T: Decode>(&self, key: &str) -> Result<T, ServiceError> {
        T::decode(&self.object(key)?)
    }

    pub fn decode_optional<T: Decode>(&self, key: &str) -> Result<Option<T>, ServiceError> {
        self.optional_object(key)?
            .map(|fields| T::decode(&fields))
            .transpose()
    }

    /// Closed enum stored by its backend string. Missing or empty yields `None`.
    pub fn choice<C: MenuChoice>(&self, key: &str) -> Result<Option<C>, ServiceError> {
        let raw = self.string(key)?;
        if raw.is_empty() {
            return Ok(None);
        }
        C::from_wire(&raw)
            .map(Some)
            .ok_or_else(|| ServiceError::InvalidEnumChoice {
                field: self.child_path(key),
                value: raw,
            })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serde helper for `skip_serializing_if` on boolean fields
pub fn is_false(value: &bool) -> bool {
    !*value
}

/// Wrap an answered sub-object, leaving it absent if it was absent and still holds zero values
pub fn keep_unset<T: Default + PartialEq>(stored: &Option<T>, answer: T) -> Option<T> {
    if stored.is_none() && answer == T::default() {
        None
    } else {
        Some(answer)
    }
}

/// Write `updated` into `stored`.
///
/// Keys listed under `properties` of `schema` belong to the typed specification:
/// they take their value from `updated` (recursing into nested objects) and are
/// removed when `updated` no longer carries them, together with any spelling that
/// differs only in case. Every other key of `stored` is kept.
pub fn merge_owned(stored: &mut Document, mut updated: Document, schema: &Value) {
    let Some(owned) = schema.get("properties").and_then(Value::as_object) else {
        *stored = updated;
        return;
    };

    for (key, property) in owned {
        let previous = take_key(stored, key);
        let Some(value) = updated.remove(key) else {
            continue;
        };
        let value = match (previous, value) {
            (Some(Value::Object(mut previous)), Value::Object(value)) => {
                merge_owned(&mut previous, value, property);
                Value::Object(previous)
            }
            (_, value) => value,
        };
        stored.insert(key.clone(), value);
    }

    for (key, value) in updated {
        take_key(stored, &key);
        stored.insert(key, value);
    }
}

/// Remove every spelling of `key`, returning the value decoding would have read
fn take_key(document: &mut Document, key: &str) -> Option<Value> {
    let spellings: Vec<String> = document
        .keys()
        .filter(|k| k.eq_ignore_ascii_case(key))
        .cloned()
        .collect();

    let mut found = document.remove(key);
    for spelling in spellings {
        if let Some(value) = document.remove(&spelling) {
            found.get_or_insert(value);
        }
    }
    found
}
