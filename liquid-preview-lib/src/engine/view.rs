//! `liquid` view traits for dynamic values.
//!
//! Templates read the value tree in place; object lookups go through
//! [`DynamicMap::get`] and so ignore case. A member the map does not have
//! reads as nil, so optional fields left out of sample data render empty.

use crate::value::{DynamicList, DynamicMap, DynamicValue};
use liquid::model::{
    ArrayView, DisplayCow, KString, KStringCow, Object, ObjectView, ScalarCow, State, Value,
    ValueView,
};
use std::fmt::Write;

static NIL: DynamicValue = DynamicValue::Null;

// Left to liquid so that `map.size` still counts members.
const SIZE_INDEX: &str = "size";

fn render_list(list: &DynamicList) -> String {
    list.iter().map(render_value).collect()
}

fn render_map(map: &DynamicMap) -> String {
    map.iter()
        .map(|(key, value)| format!("{key}{}", render_value(value)))
        .collect()
}

fn render_value(value: &DynamicValue) -> String {
    match value {
        DynamicValue::Null => String::new(),
        DynamicValue::Bool(b) => b.to_string(),
        DynamicValue::Integer(i) => i.to_string(),
        DynamicValue::Float(f) => f.to_string(),
        DynamicValue::String(s) => s.clone(),
        DynamicValue::List(list) => render_list(list),
        DynamicValue::Map(map) => render_map(map),
    }
}

fn source_list(list: &DynamicList) -> String {
    let items: Vec<String> = list.iter().map(source_value).collect();
    format!("[{}]", items.join(", "))
}

fn source_map(map: &DynamicMap) -> String {
    let mut out = String::from("{");
    for (position, (key, value)) in map.iter().enumerate() {
        if position > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, r#""{key}": {}"#, source_value(value));
    }
    out.push('}');
    out
}

fn source_value(value: &DynamicValue) -> String {
    match value {
        DynamicValue::Null => "nil".to_string(),
        DynamicValue::String(s) => format!("{s:?}"),
        DynamicValue::List(list) => source_list(list),
        DynamicValue::Map(map) => source_map(map),
        scalar => render_value(scalar),
    }
}

impl ValueView for DynamicValue {
    fn as_debug(&self) -> &dyn std::fmt::Debug {
        self
    }

    fn render(&self) -> DisplayCow<'_> {
        match self {
            DynamicValue::String(s) => DisplayCow::Borrowed(s),
            DynamicValue::List(list) => list.render(),
            DynamicValue::Map(map) => map.render(),
            other => DisplayCow::Owned(Box::new(render_value(other))),
        }
    }

    fn source(&self) -> DisplayCow<'_> {
        DisplayCow::Owned(Box::new(source_value(self)))
    }

    fn type_name(&self) -> &'static str {
        match self {
            DynamicValue::Null => "nil",
            DynamicValue::Bool(_) => "boolean",
            DynamicValue::Integer(_) => "whole number",
            DynamicValue::Float(_) => "fractional number",
            DynamicValue::String(_) => "string",
            DynamicValue::List(_) => "array",
            DynamicValue::Map(_) => "object",
        }
    }

    fn query_state(&self, state: State) -> bool {
        match self {
            DynamicValue::Null => match state {
                State::Truthy => false,
                State::DefaultValue | State::Empty | State::Blank => true,
            },
            DynamicValue::Bool(b) => match state {
                State::Truthy => *b,
                State::DefaultValue | State::Blank => !*b,
                State::Empty => false,
            },
            DynamicValue::Integer(_) | DynamicValue::Float(_) => {
                matches!(state, State::Truthy)
            }
            DynamicValue::String(s) => match state {
                State::Truthy => true,
                State::DefaultValue | State::Empty => s.is_empty(),
                State::Blank => s.trim().is_empty(),
            },
            DynamicValue::List(list) => list.query_state(state),
            DynamicValue::Map(map) => map.query_state(state),
        }
    }

    fn to_kstr(&self) -> KStringCow<'_> {
        match self {
            DynamicValue::String(s) => KStringCow::from_ref(s),
            other => KStringCow::from_string(render_value(other)),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            DynamicValue::Null => Value::Nil,
            DynamicValue::Bool(b) => Value::scalar(*b),
            DynamicValue::Integer(i) => Value::scalar(*i),
            DynamicValue::Float(f) => Value::scalar(*f),
            DynamicValue::String(s) => Value::scalar(s.clone()),
            DynamicValue::List(list) => list.to_value(),
            DynamicValue::Map(map) => map.to_value(),
        }
    }

    fn as_scalar(&self) -> Option<ScalarCow<'_>> {
        match self {
            DynamicValue::Bool(b) => Some(ScalarCow::new(*b)),
            DynamicValue::Integer(i) => Some(ScalarCow::new(*i)),
            DynamicValue::Float(f) => Some(ScalarCow::new(*f)),
            DynamicValue::String(s) => Some(ScalarCow::new(s.as_str())),
            _ => None,
        }
    }

    fn as_array(&self) -> Option<&dyn ArrayView> {
        match self {
            DynamicValue::List(list) => Some(list),
            _ => None,
        }
    }

    fn as_object(&self) -> Option<&dyn ObjectView> {
        match self {
            DynamicValue::Map(map) => Some(map),
            _ => None,
        }
    }

    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl ValueView for DynamicList {
    fn as_debug(&self) -> &dyn std::fmt::Debug {
        self
    }

    fn render(&self) -> DisplayCow<'_> {
        DisplayCow::Owned(Box::new(render_list(self)))
    }

    fn source(&self) -> DisplayCow<'_> {
        DisplayCow::Owned(Box::new(source_list(self)))
    }

    fn type_name(&self) -> &'static str {
        "array"
    }

    fn query_state(&self, state: State) -> bool {
        match state {
            State::Truthy => true,
            State::DefaultValue | State::Empty | State::Blank => self.is_empty(),
        }
    }

    fn to_kstr(&self) -> KStringCow<'_> {
        KStringCow::from_string(render_list(self))
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(ValueView::to_value).collect())
    }

    fn as_array(&self) -> Option<&dyn ArrayView> {
        Some(self)
    }
}

impl ArrayView for DynamicList {
    fn as_value(&self) -> &dyn ValueView {
        self
    }

    fn size(&self) -> i64 {
        self.len() as i64
    }

    fn values<'k>(&'k self) -> Box<dyn Iterator<Item = &'k dyn ValueView> + 'k> {
        Box::new(self.iter().map(|v| v as &dyn ValueView))
    }

    fn contains_key(&self, index: i64) -> bool {
        self.resolve_index(index).is_some()
    }

    fn get(&self, index: i64) -> Option<&dyn ValueView> {
        self.resolve_index(index)
            .and_then(|position| DynamicList::get(self, position))
            .map(|v| v as &dyn ValueView)
    }
}

impl DynamicList {
    /// Liquid indexes from the end with negative numbers.
    fn resolve_index(&self, index: i64) -> Option<usize> {
        let len = self.len() as i64;
        let position = if index < 0 { len + index } else { index };
        (0..len).contains(&position).then_some(position as usize)
    }
}

impl ValueView for DynamicMap {
    fn as_debug(&self) -> &dyn std::fmt::Debug {
        self
    }

    fn render(&self) -> DisplayCow<'_> {
        DisplayCow::Owned(Box::new(render_map(self)))
    }

    fn source(&self) -> DisplayCow<'_> {
        DisplayCow::Owned(Box::new(source_map(self)))
    }

    fn type_name(&self) -> &'static str {
        "object"
    }

    fn query_state(&self, state: State) -> bool {
        match state {
            State::Truthy => true,
            State::DefaultValue | State::Empty | State::Blank => self.is_empty(),
        }
    }

    fn to_kstr(&self) -> KStringCow<'_> {
        KStringCow::from_string(render_map(self))
    }

    fn to_value(&self) -> Value {
        let mut object = Object::new();
        for (key, value) in self.iter() {
            object.insert(KString::from_ref(key), value.to_value());
        }
        Value::Object(object)
    }

    fn as_object(&self) -> Option<&dyn ObjectView> {
        Some(self)
    }
}

impl ObjectView for DynamicMap {
    fn as_value(&self) -> &dyn ValueView {
        self
    }

    fn size(&self) -> i64 {
        self.len() as i64
    }

    fn keys<'k>(&'k self) -> Box<dyn Iterator<Item = KStringCow<'k>> + 'k> {
        Box::new(DynamicMap::keys(self).map(KStringCow::from_ref))
    }

    fn values<'k>(&'k self) -> Box<dyn Iterator<Item = &'k dyn ValueView> + 'k> {
        Box::new(DynamicMap::values(self).map(|v| v as &dyn ValueView))
    }

    fn iter<'k>(&'k self) -> Box<dyn Iterator<Item = (KStringCow<'k>, &'k dyn ValueView)> + 'k> {
        Box::new(
            DynamicMap::iter(self).map(|(k, v)| (KStringCow::from_ref(k), v as &dyn ValueView)),
        )
    }

    fn contains_key(&self, index: &str) -> bool {
        DynamicMap::contains_key(self, index)
    }

    fn get<'s>(&'s self, index: &str) -> Option<&'s dyn ValueView> {
        match DynamicMap::get(self, index) {
            Some(value) => Some(value as &dyn ValueView),
            None if index == SIZE_INDEX => None,
            None => Some(&NIL as &dyn ValueView),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_lookup_ignores_case() {
        let value = DynamicValue::from(json!({"Title": "Hello", "Items": [1, 2]}));
        let object = value.as_object().unwrap();

        assert_eq!(object.size(), 2);
        assert!(ObjectView::contains_key(object, "title"));
        assert_eq!(
            ObjectView::get(object, "TITLE").unwrap().to_kstr().as_str(),
            "Hello"
        );
        assert_eq!(
            ObjectView::get(object, "items")
                .and_then(|v| v.as_array())
                .map(|a| a.size()),
            Some(2)
        );
    }

    #[test]
    fn test_missing_member_reads_as_nil() {
        let value = DynamicValue::from(json!({"Title": "Hello"}));
        let object = value.as_object().unwrap();

        assert!(!ObjectView::contains_key(object, "Subtitle"));
        assert!(ObjectView::get(object, "Subtitle").unwrap().is_nil());
        assert!(ObjectView::get(object, "size").is_none());
    }

    #[test]
    fn test_negative_index() {
        let value = DynamicValue::from(json!(["a", "b", "c"]));
        let array = value.as_array().unwrap();

        assert_eq!(array.get(-1).unwrap().to_kstr().as_str(), "c");
        assert_eq!(array.get(0).unwrap().to_kstr().as_str(), "a");
        assert!(array.get(3).is_none());
        assert!(!array.contains_key(-4));
    }

    #[test]
    fn test_states() {
        assert!(!DynamicValue::Null.query_state(State::Truthy));
        assert!(!DynamicValue::Bool(false).query_state(State::Truthy));
        assert!(DynamicValue::Integer(0).query_state(State::Truthy));
        assert!(DynamicValue::from("").query_state(State::Truthy));
        assert!(DynamicValue::from("").query_state(State::Empty));
        assert!(DynamicValue::from("  ").query_state(State::Blank));
        assert!(DynamicValue::List(DynamicList::new()).query_state(State::Empty));
        assert!(!DynamicValue::from(json!({"a": 1})).query_state(State::Empty));
    }

    #[test]
    fn test_to_value() {
        let value = DynamicValue::from(json!({"Count": 2, "Tags": ["x"], "Ratio": 0.5}));
        let converted = value.to_value();
        let object = converted.as_object().unwrap();

        assert_eq!(
            object.get("Count").unwrap().as_scalar().unwrap().to_integer(),
            Some(2)
        );
        assert_eq!(object.get("Tags").unwrap().as_array().unwrap().size(), 1);
        assert_eq!(
            object.get("Ratio").unwrap().as_scalar().unwrap().to_float(),
            Some(0.5)
        );
    }

    #[test]
    fn test_render_and_source() {
        assert_eq!(DynamicValue::Float(42.5).render().to_string(), "42.5");
        assert_eq!(DynamicValue::Float(100.0).render().to_string(), "100");
        assert_eq!(DynamicValue::Null.render().to_string(), "");
        assert_eq!(
            DynamicValue::from(json!(["a", 1])).source().to_string(),
            r#"["a", 1]"#
        );
    }
}
