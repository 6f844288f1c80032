// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-length list fields.
//!
//! A list covers the index range `[start_index, end_index)`. The stored
//! value always has `end_index` slots: slots below `start_index` are a
//! `Null` gap so that index `i` addresses slot `i` for non-zero-based
//! lists, and every slot in range holds a cleaned element. On the wire the
//! gap is dropped and position `j` carries index `start_index + j`.

use crate::error::{AddressError, ConfigError, ValidationError};
use crate::field::Field;
use crate::value::{Key, Value};
use std::ops::Range;

/// Largest `end_index` a list may declare. Storage always holds `end_index`
/// slots, gap included.
pub const MAX_LIST_SLOTS: usize = 1 << 20;

/// Static configuration of a list field.
///
/// `length` alone means `[0, length)`; with a `start_index` it means
/// `[start_index, start_index + length)`. An explicit `end_index` wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListOptions {
    pub length: Option<usize>,
    pub start_index: usize,
    pub end_index: Option<usize>,
    /// Accessor and channel name; defaults to the subfield's name.
    pub element_name: Option<String>,
}

impl ListOptions {
    /// Zero-based list of `length` elements.
    pub fn length(length: usize) -> Self {
        Self {
            length: Some(length),
            ..Self::default()
        }
    }

    /// List addressed by `[start, end)`.
    pub fn range(start: usize, end: usize) -> Self {
        Self {
            start_index: start,
            end_index: Some(end),
            ..Self::default()
        }
    }

    /// Set the first addressable index.
    pub fn start_index(mut self, start: usize) -> Self {
        self.start_index = start;
        self
    }

    /// Name the element accessor (`getPixel` rather than `getRow`).
    pub fn element_name(mut self, name: impl Into<String>) -> Self {
        self.element_name = Some(name.into());
        self
    }
}

impl From<usize> for ListOptions {
    fn from(length: usize) -> Self {
        Self::length(length)
    }
}

/// List kind: one repeated subfield over an index range.
#[derive(Debug, Clone, PartialEq)]
pub struct ListDescriptor {
    subfield: Box<Field>,
    options: ListOptions,
}

impl ListDescriptor {
    pub(crate) fn new(subfield: Field, options: ListOptions) -> Self {
        Self {
            subfield: Box::new(subfield),
            options,
        }
    }

    /// The repeated element field.
    pub fn subfield(&self) -> &Field {
        &self.subfield
    }

    /// Addressable index range.
    pub fn range(&self) -> Range<usize> {
        let start = self.options.start_index;
        let end = self
            .options
            .end_index
            .or_else(|| self.options.length.map(|len| start.saturating_add(len)))
            .unwrap_or(start);
        start..end
    }

    /// Number of addressable elements (and of wire elements).
    pub fn len(&self) -> usize {
        self.range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn element_name(&self) -> &str {
        self.options
            .element_name
            .as_deref()
            .unwrap_or_else(|| self.subfield.name())
    }

    pub(crate) fn resolve(&mut self, field: &str) -> Result<(), ConfigError> {
        if self.options.end_index.is_none() && self.options.length.is_none() {
            return Err(ConfigError::MissingListRange {
                field: field.to_string(),
            });
        }
        let overflow = || ConfigError::ListRangeOverflow {
            field: field.to_string(),
            limit: MAX_LIST_SLOTS,
        };
        let start = self.options.start_index;
        let end = match (self.options.end_index, self.options.length) {
            (Some(end), _) => end,
            (None, Some(len)) => start.checked_add(len).ok_or_else(overflow)?,
            (None, None) => start,
        };
        if start > end {
            return Err(ConfigError::InvertedListRange {
                field: field.to_string(),
                start,
                end,
            });
        }
        if end > MAX_LIST_SLOTS {
            return Err(overflow());
        }
        self.subfield.resolve()
    }

    pub(crate) fn default_value(&self) -> Value {
        let mut slots = self.gap();
        slots.extend(self.range().map(|_| self.subfield.default_value()));
        Value::List(slots)
    }

    /// Raw input is indexed absolutely; missing and null elements take the
    /// subfield default, extra elements are dropped.
    pub(crate) fn clean(&self, field: &str, raw: &Value) -> Result<Value, ValidationError> {
        let items = raw.as_list().ok_or_else(|| {
            ValidationError::new(field, format!("expected a list, got {}", raw.kind_name()))
        })?;
        let mut slots = self.gap();
        for index in self.range() {
            let slot = match items.get(index) {
                Some(item) if !item.is_null() => self.subfield.clean(item)?,
                _ => self.subfield.default_value(),
            };
            slots.push(slot);
        }
        Ok(Value::List(slots))
    }

    pub(crate) fn serialize(&self, value: &Value) -> Value {
        let slots = value
            .as_list()
            .and_then(|items| items.get(self.range()))
            .unwrap_or_default();
        Value::List(slots.iter().map(|v| self.subfield.serialize(v)).collect())
    }

    /// Wire position `j` lands on index `start_index + j`; short wire lists
    /// are backfilled with subfield defaults.
    pub(crate) fn deserialize(&self, wire: &Value) -> Value {
        let items = wire.as_list().unwrap_or_default();
        let mut slots = self.gap();
        for offset in 0..self.len() {
            slots.push(match items.get(offset) {
                Some(item) => self.subfield.deserialize(item),
                None => self.subfield.default_value(),
            });
        }
        Value::List(slots)
    }

    pub(crate) fn child<'v>(
        &self,
        field: &str,
        value: &'v Value,
        key: &Key,
    ) -> Result<(&Field, &'v Value), AddressError> {
        let index = self.check_index(field, key)?;
        let slot = value
            .as_list()
            .and_then(|items| items.get(index))
            .ok_or_else(|| AddressError::ShapeMismatch {
                field: field.to_string(),
            })?;
        Ok((&self.subfield, slot))
    }

    pub(crate) fn child_mut<'v>(
        &self,
        field: &str,
        value: &'v mut Value,
        key: &Key,
    ) -> Result<(&Field, &'v mut Value), AddressError> {
        let index = self.check_index(field, key)?;
        match value {
            Value::List(items) => match items.get_mut(index) {
                Some(slot) => Ok((&self.subfield, slot)),
                None => Err(AddressError::ShapeMismatch {
                    field: field.to_string(),
                }),
            },
            _ => Err(AddressError::ShapeMismatch {
                field: field.to_string(),
            }),
        }
    }

    fn check_index(&self, field: &str, key: &Key) -> Result<usize, AddressError> {
        let range = self.range();
        match key {
            Key::Index(index) if range.contains(index) => Ok(*index),
            Key::Index(index) => Err(AddressError::IndexOutOfRange {
                field: field.to_string(),
                index: *index,
                start: range.start,
                end: range.end,
            }),
            Key::Name(_) => Err(AddressError::WrongKeyKind {
                field: field.to_string(),
                expected: "position",
                key: key.clone(),
            }),
        }
    }

    fn gap(&self) -> Vec<Value> {
        let range = self.range();
        let mut slots = Vec::with_capacity(range.end);
        slots.resize(range.start, Value::Null);
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    fn elements(options: ListOptions) -> Field {
        Field::list(
            "elements",
            Field::integer("element").with_default(0).with_max(100),
            options,
        )
        .resolved()
        .expect("valid list")
    }

    #[test]
    fn test_range_forms() {
        let list = ListDescriptor::new(Field::integer("e"), ListOptions::length(5));
        assert_eq!(list.range(), 0..5);
        let list = ListDescriptor::new(Field::integer("e"), ListOptions::range(1, 6));
        assert_eq!(list.range(), 1..6);
        let list = ListDescriptor::new(Field::integer("e"), ListOptions::length(3).start_index(2));
        assert_eq!(list.range(), 2..5);
    }

    #[test]
    fn test_missing_range_is_config_error() {
        let err = Field::list(
            "elements",
            Field::integer("element"),
            ListOptions::default().start_index(1),
        )
        .resolved()
        .expect_err("no range");
        assert_eq!(
            err,
            ConfigError::MissingListRange {
                field: "elements".into()
            }
        );
    }

    #[test]
    fn test_inverted_range_is_config_error() {
        let err = Field::list("elements", Field::integer("element"), ListOptions::range(4, 2))
            .resolved()
            .expect_err("inverted");
        assert_eq!(
            err,
            ConfigError::InvertedListRange {
                field: "elements".into(),
                start: 4,
                end: 2
            }
        );
    }

    #[test]
    fn test_oversized_range_is_config_error() {
        let err = Field::list(
            "elements",
            Field::integer("element"),
            ListOptions::length(usize::MAX).start_index(1),
        )
        .resolved()
        .expect_err("overflowing length");
        assert!(matches!(err, ConfigError::ListRangeOverflow { .. }));

        let err = Field::list(
            "elements",
            Field::integer("element"),
            ListOptions::range(0, MAX_LIST_SLOTS + 1),
        )
        .resolved()
        .expect_err("too many slots");
        assert!(matches!(err, ConfigError::ListRangeOverflow { .. }));

        assert!(Field::list(
            "elements",
            Field::integer("element"),
            ListOptions::range(0, MAX_LIST_SLOTS)
        )
        .resolved()
        .is_ok());
    }

    #[test]
    fn test_clean_pads_and_truncates() {
        let field = elements(ListOptions::length(5));
        assert_eq!(
            field.clean(&Value::list([1, 2, 3])),
            Ok(Value::list([1, 2, 3, 0, 0]))
        );
        assert_eq!(
            field.clean(&Value::list([1, 2, 3, 4, 5, 6, 7])),
            Ok(Value::list([1, 2, 3, 4, 5]))
        );
        assert!(field.clean(&Value::from("nope")).is_err());
    }

    #[test]
    fn test_one_based_gap() {
        let field = elements(ListOptions::range(1, 6));
        let cleaned = field
            .clean(&Value::List(vec![
                Value::Null,
                2.into(),
                3.into(),
                5.into(),
                7.into(),
                11.into(),
            ]))
            .expect("clean");
        assert_eq!(
            cleaned,
            Value::List(vec![
                Value::Null,
                2.into(),
                3.into(),
                5.into(),
                7.into(),
                11.into()
            ])
        );
        assert_eq!(field.get_element(&cleaned, &path![3]), Ok(&Value::Integer(5)));
        assert!(matches!(
            field.get_element(&cleaned, &path![0]),
            Err(AddressError::IndexOutOfRange { start: 1, end: 6, .. })
        ));
        assert_eq!(field.serialize(&cleaned), Value::list([2, 3, 5, 7, 11]));
    }

    #[test]
    fn test_wire_offsets() {
        let field = elements(ListOptions::range(1, 6));
        let stored = field.deserialize(&Value::list([2, 3, 5, 7, 11]));
        assert_eq!(field.get_element(&stored, &path![3]), Ok(&Value::Integer(5)));
        assert_eq!(field.serialize(&stored), Value::list([2, 3, 5, 7, 11]));
    }

    #[test]
    fn test_name_key_rejected() {
        let field = elements(ListOptions::length(5));
        let stored = field.default_value();
        assert!(matches!(
            field.get_element(&stored, &path!["x"]),
            Err(AddressError::WrongKeyKind { .. })
        ));
    }
}
