// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field declarations.
//!
//! A [`Field`] is a named, immutable description of one slot of a schema.
//! Every kind implements the same contract:
//!
//! - `default_value`: the value a fresh instance holds (fresh copy each call)
//! - `clean`: coerce raw input, or fail with a [`ValidationError`]
//! - `serialize` / `deserialize`: stored value to and from the primitive wire tree
//! - `get_element` / `set_element`: addressed access along a [`Key`] path
//!
//! Composite kinds (list, struct, tuple) recurse into their children for
//! each of these; leaves (scalars and nested models) end the path.
//!
//! # Example
//!
//! ```
//! use fieldkit::{Field, ListOptions, Value, path};
//!
//! let row = Field::list(
//!     "row",
//!     Field::integer("cell").with_default(0).with_max(9),
//!     ListOptions::length(3),
//! )
//! .resolved()
//! .unwrap();
//!
//! let mut stored = row.clean(&Value::list([1, 20])).unwrap();
//! assert_eq!(stored, Value::list([1, 9, 0]));
//!
//! assert!(row.set_element(&mut stored, &path![2], &Value::from("4")).unwrap());
//! assert_eq!(row.get_element(&stored, &path![2]).unwrap(), &Value::Integer(4));
//! ```

mod list;
mod record;
mod scalar;

pub use list::{ListDescriptor, ListOptions, MAX_LIST_SLOTS};
pub use record::Members;
pub use scalar::{Bounds, EnumChoice};

use crate::error::{AddressError, ConfigError, ValidationError};
use crate::model::Model;
use crate::naming;
use crate::schema::Schema;
use crate::value::{Key, Value};
use std::sync::Arc;

/// Kind-specific part of a field declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Untyped; stores whatever it is given.
    Value,
    Integer(Bounds),
    Number(Bounds),
    Boolean,
    Enum(Vec<EnumChoice>),
    /// Nested instance of another schema.
    Model(Arc<Schema>),
    List(ListDescriptor),
    Struct(Members),
    Tuple(Members),
}

impl FieldKind {
    /// Short name of the kind, as used in schema documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Boolean => "boolean",
            Self::Enum(_) => "enum",
            Self::Model(_) => "model",
            Self::List(_) => "list",
            Self::Struct(_) => "struct",
            Self::Tuple(_) => "tuple",
        }
    }
}

/// A named field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    label: Option<String>,
    default: Option<Value>,
    kind: FieldKind,
    /// A bound was declared on a kind without bounds; rejected on resolve.
    misplaced_bounds: bool,
}

impl Field {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            default: None,
            kind,
            misplaced_bounds: false,
        }
    }

    /// Untyped field.
    pub fn value(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Value)
    }

    /// Integer field; see [`Field::with_min`] and [`Field::with_max`].
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer(Bounds::default()))
    }

    /// Floating point field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number(Bounds::default()))
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Enumerated field over `(value, label)` choices.
    pub fn enumeration<V, L>(name: impl Into<String>, choices: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<Value>,
        L: Into<String>,
    {
        let choices = choices
            .into_iter()
            .map(|(value, label)| EnumChoice::new(value, label))
            .collect();
        Self::new(name, FieldKind::Enum(choices))
    }

    /// Field holding a nested instance of `schema`.
    pub fn model(name: impl Into<String>, schema: &Arc<Schema>) -> Self {
        Self::new(name, FieldKind::Model(Arc::clone(schema)))
    }

    /// Fixed-length list of `subfield`.
    pub fn list(name: impl Into<String>, subfield: Field, options: impl Into<ListOptions>) -> Self {
        Self::new(
            name,
            FieldKind::List(ListDescriptor::new(subfield, options.into())),
        )
    }

    /// Struct addressed by member name.
    pub fn structure(name: impl Into<String>, members: impl IntoIterator<Item = Field>) -> Self {
        Self::new(
            name,
            FieldKind::Struct(Members::new(members.into_iter().collect())),
        )
    }

    /// Tuple addressed by member position.
    pub fn tuple(name: impl Into<String>, members: impl IntoIterator<Item = Field>) -> Self {
        Self::new(
            name,
            FieldKind::Tuple(Members::new(members.into_iter().collect())),
        )
    }

    /// Declared default; cleaned when the field is resolved.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Display label; derived from the name when not set.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Lower clamp bound. Only integer and number fields have bounds; on
    /// any other kind resolving the field fails with
    /// [`ConfigError::MisplacedBounds`].
    pub fn with_min(mut self, min: impl Into<f64>) -> Self {
        match &mut self.kind {
            FieldKind::Integer(bounds) | FieldKind::Number(bounds) => bounds.min = Some(min.into()),
            _ => self.misplaced_bounds = true,
        }
        self
    }

    /// Upper clamp bound. Same restriction as [`Field::with_min`].
    pub fn with_max(mut self, max: impl Into<f64>) -> Self {
        match &mut self.kind {
            FieldKind::Integer(bounds) | FieldKind::Number(bounds) => bounds.max = Some(max.into()),
            _ => self.misplaced_bounds = true,
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit label, or one derived from the name (`isFilled` -> `Is filled`).
    pub fn label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| naming::label_for(&self.name))
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether values of this field are addressed element-wise.
    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::List(_) | FieldKind::Struct(_) | FieldKind::Tuple(_)
        )
    }

    /// Name of the accessor this field exposes on a model.
    pub(crate) fn accessor_name(&self) -> &str {
        match &self.kind {
            FieldKind::List(list) => list.element_name(),
            _ => &self.name,
        }
    }

    /// Validate the declaration and clean declared defaults, recursively.
    pub fn resolved(mut self) -> Result<Self, ConfigError> {
        self.resolve()?;
        Ok(self)
    }

    pub(crate) fn resolve(&mut self) -> Result<(), ConfigError> {
        if self.misplaced_bounds {
            return Err(ConfigError::MisplacedBounds {
                field: self.name.clone(),
                kind: self.kind.name(),
            });
        }
        match &mut self.kind {
            FieldKind::Integer(bounds) | FieldKind::Number(bounds) => {
                if let (Some(min), Some(max)) = (bounds.min, bounds.max) {
                    if min > max {
                        return Err(ConfigError::InvertedBounds {
                            field: self.name.clone(),
                            min,
                            max,
                        });
                    }
                }
            }
            FieldKind::Enum(choices) if choices.is_empty() => {
                return Err(ConfigError::EmptyChoices {
                    field: self.name.clone(),
                });
            }
            FieldKind::List(list) => list.resolve(&self.name)?,
            FieldKind::Struct(members) | FieldKind::Tuple(members) => members.resolve(&self.name)?,
            _ => {}
        }
        if let Some(raw) = self.default.take() {
            let cleaned = self.clean(&raw).map_err(|err| ConfigError::InvalidDefault {
                field: self.name.clone(),
                reason: err.reason,
            })?;
            self.default = Some(cleaned);
        }
        Ok(())
    }

    /// Initial value for a fresh instance. Never shared between calls.
    pub fn default_value(&self) -> Value {
        if let Some(default) = &self.default {
            return default.clone();
        }
        match &self.kind {
            FieldKind::Model(schema) => Value::from(Model::with_defaults(schema)),
            FieldKind::List(list) => list.default_value(),
            FieldKind::Struct(members) => members.struct_default(),
            FieldKind::Tuple(members) => members.tuple_default(),
            _ => Value::Null,
        }
    }

    /// Coerce raw input into this field's stored form.
    pub fn clean(&self, raw: &Value) -> Result<Value, ValidationError> {
        match &self.kind {
            FieldKind::Value => Ok(raw.clone()),
            FieldKind::Integer(bounds) => scalar::clean_integer(&self.name, bounds, raw),
            FieldKind::Number(bounds) => scalar::clean_number(&self.name, bounds, raw),
            FieldKind::Boolean => Ok(scalar::clean_boolean(raw)),
            FieldKind::Enum(choices) => scalar::clean_enum(&self.name, choices, raw),
            FieldKind::Model(schema) => clean_model(&self.name, schema, raw),
            FieldKind::List(list) => list.clean(&self.name, raw),
            FieldKind::Struct(members) => members.clean_struct(&self.name, raw),
            FieldKind::Tuple(members) => members.clean_tuple(&self.name, raw),
        }
    }

    /// Stored value to primitive wire tree.
    pub fn serialize(&self, value: &Value) -> Value {
        match &self.kind {
            FieldKind::Model(_) => value.as_model().map_or(Value::Null, Model::to_wire),
            FieldKind::List(list) => list.serialize(value),
            FieldKind::Struct(members) => members.serialize_struct(value),
            FieldKind::Tuple(members) => members.serialize_tuple(value),
            _ => value.to_primitive(),
        }
    }

    /// Primitive wire tree to stored value. Trusts its input: nothing is
    /// cleaned, absent composite members are backfilled with defaults.
    pub fn deserialize(&self, wire: &Value) -> Value {
        match &self.kind {
            FieldKind::Integer(_) => scalar::integer_from_wire(wire),
            FieldKind::Number(_) => scalar::number_from_wire(wire),
            FieldKind::Model(schema) => Value::from(Model::from_wire(schema, wire)),
            FieldKind::List(list) => list.deserialize(wire),
            FieldKind::Struct(members) => members.deserialize_struct(wire),
            FieldKind::Tuple(members) => members.deserialize_tuple(wire),
            _ => wire.clone(),
        }
    }

    /// Read the element at `path` inside `value`. An empty path returns
    /// `value` itself.
    pub fn get_element<'v>(&self, value: &'v Value, path: &[Key]) -> Result<&'v Value, AddressError> {
        let Some((key, rest)) = path.split_first() else {
            return Ok(value);
        };
        let (child, slot) = self.child(value, key)?;
        child.get_element(slot, rest)
    }

    /// Write `raw` at `path` inside `value`, cleaning it with the terminal
    /// field. Returns whether the stored value changed; input the terminal
    /// field rejects leaves the value untouched.
    pub fn set_element(&self, value: &mut Value, path: &[Key], raw: &Value) -> Result<bool, AddressError> {
        let Some((key, rest)) = path.split_first() else {
            return Ok(self.replace(value, raw));
        };
        let (child, slot) = self.child_mut(value, key)?;
        child.set_element(slot, rest, raw)
    }

    fn replace(&self, slot: &mut Value, raw: &Value) -> bool {
        match self.clean(raw) {
            Ok(cleaned) if cleaned != *slot => {
                *slot = cleaned;
                true
            }
            Ok(_) => false,
            Err(err) => {
                log::trace!("[fieldkit] write discarded: {}", err);
                false
            }
        }
    }

    fn child<'v>(&self, value: &'v Value, key: &Key) -> Result<(&Field, &'v Value), AddressError> {
        match &self.kind {
            FieldKind::List(list) => list.child(&self.name, value, key),
            FieldKind::Struct(members) => members.struct_child(&self.name, value, key),
            FieldKind::Tuple(members) => members.tuple_child(&self.name, value, key),
            _ => Err(self.past_leaf(key)),
        }
    }

    fn child_mut<'v>(
        &self,
        value: &'v mut Value,
        key: &Key,
    ) -> Result<(&Field, &'v mut Value), AddressError> {
        match &self.kind {
            FieldKind::List(list) => list.child_mut(&self.name, value, key),
            FieldKind::Struct(members) => members.struct_child_mut(&self.name, value, key),
            FieldKind::Tuple(members) => members.tuple_child_mut(&self.name, value, key),
            _ => Err(self.past_leaf(key)),
        }
    }

    fn past_leaf(&self, key: &Key) -> AddressError {
        AddressError::PastLeaf {
            field: self.name.clone(),
            key: key.clone(),
        }
    }
}

fn clean_model(field: &str, schema: &Arc<Schema>, raw: &Value) -> Result<Value, ValidationError> {
    match raw {
        Value::Model(model) if Arc::ptr_eq(model.schema(), schema) || model.schema() == schema => {
            Ok(raw.clone())
        }
        Value::Model(model) => Err(ValidationError::new(
            field,
            format!(
                "expected a {} instance, got {}",
                schema.name(),
                model.schema().name()
            ),
        )),
        Value::Map(_) => Ok(Value::from(Model::new(schema, raw))),
        other => Err(ValidationError::new(
            field,
            format!("{} is not a {} document", other.kind_name(), schema.name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_scalar_defaults() {
        let width = Field::integer("width")
            .with_default(32)
            .with_min(1)
            .with_max(1000)
            .resolved()
            .expect("valid");
        assert_eq!(width.default_value(), Value::Integer(32));
        assert_eq!(Field::value("notes").default_value(), Value::Null);
    }

    #[test]
    fn test_default_is_cleaned() {
        let height = Field::number("height")
            .with_default("12.5")
            .resolved()
            .expect("valid");
        assert_eq!(height.default_value(), Value::Number(12.5));
    }

    #[test]
    fn test_invalid_default() {
        let err = Field::integer("width")
            .with_default("wide")
            .resolved()
            .expect_err("invalid");
        assert!(matches!(err, ConfigError::InvalidDefault { ref field, .. } if field == "width"));
    }

    #[test]
    fn test_inverted_bounds() {
        let err = Field::number("n")
            .with_min(10)
            .with_max(1)
            .resolved()
            .expect_err("inverted");
        assert!(matches!(err, ConfigError::InvertedBounds { .. }));
    }

    #[test]
    fn test_bounds_on_non_numeric_kind() {
        let err = Field::boolean("flag")
            .with_max(1)
            .resolved()
            .expect_err("bounded boolean");
        assert_eq!(
            err,
            ConfigError::MisplacedBounds {
                field: "flag".into(),
                kind: "boolean"
            }
        );
        assert!(Field::value("tag").with_min(0).resolved().is_err());
        assert!(Field::number("n").with_min(0).resolved().is_ok());
    }

    #[test]
    fn test_empty_enum() {
        let err = Field::enumeration("wave", Vec::<(i32, &str)>::new())
            .resolved()
            .expect_err("empty");
        assert_eq!(err, ConfigError::EmptyChoices { field: "wave".into() });
    }

    #[test]
    fn test_labels() {
        assert_eq!(Field::boolean("isFilled").label(), "Is filled");
        assert_eq!(Field::boolean("isFilled").with_label("Filled?").label(), "Filled?");
    }

    #[test]
    fn test_leaf_addressing() {
        let field = Field::integer("width");
        let mut stored = Value::Integer(5);
        assert_eq!(field.get_element(&stored, &[]), Ok(&Value::Integer(5)));
        assert_eq!(field.set_element(&mut stored, &[], &Value::from(5)), Ok(false));
        assert_eq!(field.set_element(&mut stored, &[], &Value::from("x")), Ok(false));
        assert_eq!(field.set_element(&mut stored, &[], &Value::from(6)), Ok(true));
        assert_eq!(stored, Value::Integer(6));
        assert!(matches!(
            field.get_element(&stored, &path![0]),
            Err(AddressError::PastLeaf { .. })
        ));
    }

    #[test]
    fn test_nested_composites() {
        let grid = Field::list(
            "rows",
            Field::list("row", Field::boolean("cell"), ListOptions::length(2)),
            ListOptions::length(2).element_name("cell"),
        )
        .resolved()
        .expect("valid");
        let mut stored = grid.default_value();
        assert_eq!(
            stored,
            Value::List(vec![
                Value::List(vec![Value::Null; 2]),
                Value::List(vec![Value::Null; 2]),
            ])
        );
        assert_eq!(grid.set_element(&mut stored, &path![1, 0], &Value::from(1)), Ok(true));
        assert_eq!(grid.get_element(&stored, &path![1, 0]), Ok(&Value::Bool(true)));
        assert_eq!(grid.accessor_name(), "cell");
    }

    #[test]
    fn test_untyped_field_serializes_nested_models() {
        let point = crate::schema::SchemaBuilder::new("Point")
            .field(Field::integer("x").with_default(3))
            .build()
            .expect("schema");
        let instance = Value::from(Model::with_defaults(&point));
        let field = Field::value("payload");
        let stored = field.clean(&Value::list([instance])).expect("untyped");

        let wire = field.serialize(&stored);
        assert_eq!(wire, Value::list([Value::map([("x", 3)])]));
        assert_eq!(field.deserialize(&wire), wire);
    }

    #[test]
    fn test_failed_element_fails_composite() {
        let row = Field::list("row", Field::integer("cell"), 2usize)
            .resolved()
            .expect("valid");
        assert!(row.clean(&Value::list(["1", "nope"])).is_err());
    }
}
