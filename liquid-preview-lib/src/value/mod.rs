//! Dynamic values handed to templates.
//!
//! Sample data is schema-less, so every JSON value is converted into a
//! [`DynamicValue`] tree before rendering. Maps compare keys without regard to
//! case, which lets templates read `Target.Title` and `target.title` alike.

use serde_json::Value as JsonValue;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(DynamicList),
    Map(DynamicMap),
}

impl DynamicValue {
    /// Convert a parsed JSON value into its dynamic form.
    ///
    /// Numbers become [`DynamicValue::Integer`] only when the literal was an
    /// integer that fits in an `i64`; fractions, exponents (`1e2`) and integers
    /// beyond the signed range become [`DynamicValue::Float`].
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => DynamicValue::Null,
            JsonValue::Bool(b) => DynamicValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => DynamicValue::Integer(i),
                None => DynamicValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => DynamicValue::String(s.clone()),
            JsonValue::Array(arr) => {
                DynamicValue::List(arr.iter().map(DynamicValue::from_json).collect())
            }
            JsonValue::Object(obj) => DynamicValue::Map(
                obj.iter()
                    .map(|(k, v)| (k.clone(), DynamicValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DynamicValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&DynamicMap> {
        match self {
            DynamicValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&DynamicList> {
        match self {
            DynamicValue::List(list) => Some(list),
            _ => None,
        }
    }
}

impl From<JsonValue> for DynamicValue {
    fn from(json: JsonValue) -> Self {
        DynamicValue::from_json(&json)
    }
}

impl From<&str> for DynamicValue {
    fn from(s: &str) -> Self {
        DynamicValue::String(s.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(s: String) -> Self {
        DynamicValue::String(s)
    }
}

impl From<DynamicMap> for DynamicValue {
    fn from(map: DynamicMap) -> Self {
        DynamicValue::Map(map)
    }
}

impl From<DynamicList> for DynamicValue {
    fn from(list: DynamicList) -> Self {
        DynamicValue::List(list)
    }
}

/// Ordered list of dynamic values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicList(Vec<DynamicValue>);

impl DynamicList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, value: DynamicValue) {
        self.0.push(value);
    }

    pub fn get(&self, index: usize) -> Option<&DynamicValue> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DynamicValue> {
        self.0.iter()
    }
}

impl From<Vec<DynamicValue>> for DynamicList {
    fn from(values: Vec<DynamicValue>) -> Self {
        Self(values)
    }
}

impl FromIterator<DynamicValue> for DynamicList {
    fn from_iter<I: IntoIterator<Item = DynamicValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DynamicList {
    type Item = &'a DynamicValue;
    type IntoIter = std::slice::Iter<'a, DynamicValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Insertion-ordered map whose keys compare case-insensitively.
///
/// Entries keep the spelling of the first key inserted for them; the index is
/// keyed by the lower-cased form.
#[derive(Debug, Clone, Default)]
pub struct DynamicMap {
    entries: Vec<(String, DynamicValue)>,
    index: HashMap<String, usize>,
}

impl DynamicMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(key: &str) -> String {
        key.to_lowercase()
    }

    /// Insert a value, replacing any entry whose key matches ignoring case.
    /// Returns the previous value when one was replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<DynamicValue>,
    ) -> Option<DynamicValue> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&Self::normalize(&key)) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(Self::normalize(&key), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.index
            .get(&Self::normalize(key))
            .map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&Self::normalize(key))
    }

    /// Look up a key and return it only when it holds a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(DynamicValue::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &DynamicValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DynamicValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for DynamicMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Into<String>> FromIterator<(K, DynamicValue)> for DynamicMap {
    fn from_iter<I: IntoIterator<Item = (K, DynamicValue)>>(iter: I) -> Self {
        let mut map = DynamicMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
