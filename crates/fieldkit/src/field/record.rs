// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct and tuple fields.
//!
//! Both kinds own an ordered set of named members. A struct is stored as a
//! map keyed by member name and addressed by name; a tuple is stored as a
//! list in declaration order and addressed by position. Absent or null
//! members take the member default, unknown keys and extra positions are
//! dropped.

use crate::error::{AddressError, ConfigError, ValidationError};
use crate::field::Field;
use crate::value::{Key, Value};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Ordered member fields of a struct or tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct Members {
    fields: Vec<Field>,
}

impl Members {
    pub(crate) fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Members in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn member(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub(crate) fn resolve(&mut self, parent: &str) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for field in &mut self.fields {
            if !seen.insert(field.name().to_string()) {
                return Err(ConfigError::DuplicateName {
                    parent: parent.to_string(),
                    name: field.name().to_string(),
                });
            }
            field.resolve()?;
        }
        Ok(())
    }

    // Struct form

    pub(crate) fn struct_default(&self) -> Value {
        Value::Map(
            self.fields
                .iter()
                .map(|f| (f.name().to_string(), f.default_value()))
                .collect(),
        )
    }

    pub(crate) fn clean_struct(&self, field: &str, raw: &Value) -> Result<Value, ValidationError> {
        let entries = raw.as_map().ok_or_else(|| {
            ValidationError::new(field, format!("expected a map, got {}", raw.kind_name()))
        })?;
        let mut cleaned = IndexMap::with_capacity(self.fields.len());
        for member in &self.fields {
            let value = match entries.get(member.name()) {
                Some(item) if !item.is_null() => member.clean(item)?,
                _ => member.default_value(),
            };
            cleaned.insert(member.name().to_string(), value);
        }
        Ok(Value::Map(cleaned))
    }

    pub(crate) fn serialize_struct(&self, value: &Value) -> Value {
        let entries = value.as_map();
        Value::Map(
            self.fields
                .iter()
                .map(|member| {
                    let wire = entries
                        .and_then(|e| e.get(member.name()))
                        .map_or(Value::Null, |v| member.serialize(v));
                    (member.name().to_string(), wire)
                })
                .collect(),
        )
    }

    pub(crate) fn deserialize_struct(&self, wire: &Value) -> Value {
        let entries = wire.as_map();
        Value::Map(
            self.fields
                .iter()
                .map(|member| {
                    let stored = entries
                        .and_then(|e| e.get(member.name()))
                        .map_or_else(|| member.default_value(), |v| member.deserialize(v));
                    (member.name().to_string(), stored)
                })
                .collect(),
        )
    }

    pub(crate) fn struct_child<'v>(
        &self,
        field: &str,
        value: &'v Value,
        key: &Key,
    ) -> Result<(&Field, &'v Value), AddressError> {
        let member = self.named_member(field, key)?;
        let slot = value
            .get_key(key)
            .ok_or_else(|| AddressError::ShapeMismatch {
                field: field.to_string(),
            })?;
        Ok((member, slot))
    }

    pub(crate) fn struct_child_mut<'v>(
        &self,
        field: &str,
        value: &'v mut Value,
        key: &Key,
    ) -> Result<(&Field, &'v mut Value), AddressError> {
        let member = self.named_member(field, key)?;
        let slot = value
            .get_key_mut(key)
            .ok_or_else(|| AddressError::ShapeMismatch {
                field: field.to_string(),
            })?;
        Ok((member, slot))
    }

    fn named_member(&self, field: &str, key: &Key) -> Result<&Field, AddressError> {
        match key {
            Key::Name(name) => self.member(name).ok_or_else(|| AddressError::UnknownMember {
                field: field.to_string(),
                name: name.clone(),
            }),
            Key::Index(_) => Err(AddressError::WrongKeyKind {
                field: field.to_string(),
                expected: "member name",
                key: key.clone(),
            }),
        }
    }

    // Tuple form

    pub(crate) fn tuple_default(&self) -> Value {
        Value::List(self.fields.iter().map(Field::default_value).collect())
    }

    /// Accepts a positional list or a map keyed by member name.
    pub(crate) fn clean_tuple(&self, field: &str, raw: &Value) -> Result<Value, ValidationError> {
        let lookup = |idx: usize, member: &Field| match raw {
            Value::List(items) => items.get(idx),
            Value::Map(entries) => entries.get(member.name()),
            _ => None,
        };
        if !matches!(raw, Value::List(_) | Value::Map(_)) {
            return Err(ValidationError::new(
                field,
                format!("expected a list or map, got {}", raw.kind_name()),
            ));
        }
        let mut cleaned = Vec::with_capacity(self.fields.len());
        for (idx, member) in self.fields.iter().enumerate() {
            cleaned.push(match lookup(idx, member) {
                Some(item) if !item.is_null() => member.clean(item)?,
                _ => member.default_value(),
            });
        }
        Ok(Value::List(cleaned))
    }

    pub(crate) fn serialize_tuple(&self, value: &Value) -> Value {
        let items = value.as_list().unwrap_or_default();
        Value::List(
            self.fields
                .iter()
                .enumerate()
                .map(|(idx, member)| items.get(idx).map_or(Value::Null, |v| member.serialize(v)))
                .collect(),
        )
    }

    pub(crate) fn deserialize_tuple(&self, wire: &Value) -> Value {
        let items = wire.as_list().unwrap_or_default();
        Value::List(
            self.fields
                .iter()
                .enumerate()
                .map(|(idx, member)| {
                    items
                        .get(idx)
                        .map_or_else(|| member.default_value(), |v| member.deserialize(v))
                })
                .collect(),
        )
    }

    pub(crate) fn tuple_child<'v>(
        &self,
        field: &str,
        value: &'v Value,
        key: &Key,
    ) -> Result<(&Field, &'v Value), AddressError> {
        let (index, member) = self.positional_member(field, key)?;
        let slot = value
            .get_key(&Key::Index(index))
            .ok_or_else(|| AddressError::ShapeMismatch {
                field: field.to_string(),
            })?;
        Ok((member, slot))
    }

    pub(crate) fn tuple_child_mut<'v>(
        &self,
        field: &str,
        value: &'v mut Value,
        key: &Key,
    ) -> Result<(&Field, &'v mut Value), AddressError> {
        let (index, member) = self.positional_member(field, key)?;
        let slot = value
            .get_key_mut(&Key::Index(index))
            .ok_or_else(|| AddressError::ShapeMismatch {
                field: field.to_string(),
            })?;
        Ok((member, slot))
    }

    fn positional_member(&self, field: &str, key: &Key) -> Result<(usize, &Field), AddressError> {
        match key {
            Key::Index(index) => self
                .fields
                .get(*index)
                .map(|member| (*index, member))
                .ok_or_else(|| AddressError::IndexOutOfRange {
                    field: field.to_string(),
                    index: *index,
                    start: 0,
                    end: self.fields.len(),
                }),
            Key::Name(_) => Err(AddressError::WrongKeyKind {
                field: field.to_string(),
                expected: "position",
                key: key.clone(),
            }),
        }
    }
}
