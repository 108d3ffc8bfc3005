//! Open field-name → value records.

use std::ops::Index;

use derive_more::{Deref, From, Into};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::errors::{MigrationError, MigrationResult};

/// A record: an open mapping from field name to a JSON value.
///
/// The key set of a template record defines the field set of its side for
/// the lifetime of a compiled migration. Field values of templates are never
/// read.
///
/// # Example
///
/// ```
/// use netabase_migrate::Record;
/// use serde_json::json;
///
/// let record = Record::try_from(json!({"a": "hello", "b": 10})).unwrap();
/// assert_eq!(record.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
/// assert_eq!(record.get("b"), Some(&json!(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, From, Into, Deref)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize any struct (or map) into a record.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> MigrationResult<Self> {
        Self::try_from(serde_json::to_value(value)?)
    }

    /// Deserialize the record into a typed value.
    pub fn into_deserialize<T: DeserializeOwned>(self) -> MigrationResult<T> {
        Ok(serde_json::from_value(Value::Object(self.0))?)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value.into());
        self
    }
}

impl TryFrom<Value> for Record {
    type Error = MigrationError;

    fn try_from(value: Value) -> MigrationResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(MigrationError::NotARecord(kind_of(&other).to_string())),
        }
    }
}

static NULL: Value = Value::Null;

impl Index<&str> for Record {
    type Output = Value;

    /// Like indexing a `serde_json::Value`: a missing field reads as `null`.
    fn index(&self, field: &str) -> &Value {
        self.0.get(field).unwrap_or(&NULL)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
