// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value tree.
//!
//! [`Value`] is both the raw input handed to `clean`, the stored value a
//! model keeps per field, and the primitive tree produced by `serialize`.
//! Only stored values ever contain [`Value::Model`].

use crate::model::Model;
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// A dynamic value that can hold any field's raw, stored or wire form.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    // Primitives
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),

    // Containers
    List(Vec<Value>),
    Map(IndexMap<String, Value>),

    // Stored only
    Model(Box<Model>),
}

impl Value {
    /// Build a map value, keeping the iteration order.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a list value.
    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64 (integers widen).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as map.
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as nested model instance.
    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Self::Model(m) => Some(m),
            _ => None,
        }
    }

    /// Look up one level down by key: list position or map member.
    pub fn get_key(&self, key: &Key) -> Option<&Value> {
        match (self, key) {
            (Self::List(items), Key::Index(i)) => items.get(*i),
            (Self::Map(entries), Key::Name(name)) => entries.get(name.as_str()),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Value::get_key`].
    pub fn get_key_mut(&mut self, key: &Key) -> Option<&mut Value> {
        match (self, key) {
            (Self::List(items), Key::Index(i)) => items.get_mut(*i),
            (Self::Map(entries), Key::Name(name)) => entries.get_mut(name.as_str()),
            _ => None,
        }
    }

    /// Loose truthiness: null, false, zero, NaN and "" are false,
    /// everything else (containers included) is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::List(_) | Self::Map(_) | Self::Model(_) => true,
        }
    }

    /// Copy with every nested model replaced by its wire document.
    pub fn to_primitive(&self) -> Value {
        match self {
            Self::List(items) => Self::List(items.iter().map(Value::to_primitive).collect()),
            Self::Map(entries) => Self::Map(
                entries
                    .iter()
                    .map(|(key, item)| (key.clone(), item.to_primitive()))
                    .collect(),
            ),
            Self::Model(m) => m.to_wire(),
            other => other.clone(),
        }
    }

    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Model(_) => "model",
        }
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Model> for Value {
    fn from(v: Model) -> Self {
        Self::Model(Box::new(v))
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(v: IndexMap<String, Value>) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (idx, (key, item)) in entries.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                write!(f, "}}")
            }
            Self::Model(m) => write!(f, "<{}>", m.schema().name()),
        }
    }
}

/// One step of an addressing path: a position (lists, tuples) or a
/// member name (structs).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl From<usize> for Key {
    fn from(v: usize) -> Self {
        Self::Index(v)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Self::Name(v.to_string())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Self::Name(v)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Build an addressing path array from positions and member names.
///
/// ```
/// use fieldkit::{path, Key};
///
/// let p = path![3, "x"];
/// assert_eq!(p, [Key::Index(3), Key::Name("x".into())]);
/// ```
#[macro_export]
macro_rules! path {
    ($($key:expr),* $(,)?) => {
        [$($crate::Key::from($key)),*]
    };
}

// Wire form: models serialize as their own wire document.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
            Self::Model(m) => m.to_wire().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a primitive tree value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Number(v as f64), Value::Integer))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, item)) = map.next_entry::<String, Value>()? {
            entries.insert(key, item);
        }
        Ok(Value::Map(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_values() {
        let v = Value::from(42);
        assert_eq!(v.as_i64(), Some(42));
        assert_eq!(v.as_f64(), Some(42.0));
        assert_eq!(v.as_bool(), None);

        let v = Value::from(std::f64::consts::PI);
        assert_eq!(v.as_f64(), Some(std::f64::consts::PI));
        assert_eq!(v.as_i64(), None);

        let v = Value::from("hello");
        assert_eq!(v.as_str(), Some("hello"));
    }

    #[test]
    fn test_map_keeps_order() {
        let v = Value::map([("y", 2), ("x", 1)]);
        let keys: Vec<_> = v.as_map().expect("map").keys().cloned().collect();
        assert_eq!(keys, ["y", "x"]);
        assert_eq!(v.get_key(&Key::from("x")), Some(&Value::Integer(1)));
        assert!(v.get_key(&Key::from(0)).is_none());
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(Value::from("yes").is_truthy());
        assert!(Value::list(Vec::<Value>::new()).is_truthy());
    }

    #[test]
    fn test_path_macro() {
        let p = path![2, "edges", 1];
        assert_eq!(
            p,
            [Key::Index(2), Key::Name("edges".to_string()), Key::Index(1)]
        );
        assert_eq!(p[1].to_string(), "edges");
    }

    #[test]
    fn test_json_shape() {
        let v: Value = serde_json::from_str(r#"{"a": [1, 2.5, "x", null, true]}"#).expect("parse");
        assert_eq!(
            v,
            Value::map([(
                "a",
                Value::List(vec![
                    Value::Integer(1),
                    Value::Number(2.5),
                    Value::from("x"),
                    Value::Null,
                    Value::Bool(true),
                ])
            )])
        );
        let text = serde_json::to_string(&v).expect("encode");
        assert_eq!(text, r#"{"a":[1,2.5,"x",null,true]}"#);
    }

    #[test]
    fn test_huge_unsigned_widens() {
        let v: Value = serde_json::from_str("18446744073709551615").expect("parse");
        assert!(matches!(v, Value::Number(_)));
    }
}
