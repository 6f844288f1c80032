// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model instances.
//!
//! A [`Model`] owns one stored value per top-level field of its schema.
//! Construction runs every field through `clean` and never fails: absent
//! fields and rejected input fall back to the field default. Writes go
//! through the schema's accessor table, are cleaned, and notify observers
//! only when the stored value changed.

use crate::codec;
use crate::error::{AddressError, CodecError};
use crate::field::FieldKind;
use crate::notify::{Channel, ChangeEvent, ChangeListener, ClosureListener, Observers, Subscription};
use crate::schema::{Accessor, AccessorKind, Schema};
use crate::value::{Key, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Instance of a [`Schema`].
pub struct Model {
    schema: Arc<Schema>,
    values: Vec<Value>,
    observers: Observers,
}

impl Model {
    /// Build an instance from untrusted input (a map keyed by field name).
    pub fn new(schema: &Arc<Schema>, raw: &Value) -> Self {
        let entries = raw.as_map();
        if entries.is_none() && !raw.is_null() {
            log::debug!(
                "[fieldkit] {}: ignoring {} input, expected a map",
                schema.name(),
                raw.kind_name()
            );
        }
        let values = schema
            .fields()
            .iter()
            .map(|field| match entries.and_then(|e| e.get(field.name())) {
                Some(item) => field.clean(item).unwrap_or_else(|err| {
                    log::debug!("[fieldkit] {}: {}, using default", schema.name(), err);
                    field.default_value()
                }),
                None => field.default_value(),
            })
            .collect();
        Self::from_values(schema, values)
    }

    /// Instance holding every field's default.
    pub fn with_defaults(schema: &Arc<Schema>) -> Self {
        let values = schema.fields().iter().map(|f| f.default_value()).collect();
        Self::from_values(schema, values)
    }

    /// Rebuild an instance from its wire document. Present fields are
    /// deserialized as-is, absent ones take their default.
    pub fn from_wire(schema: &Arc<Schema>, wire: &Value) -> Self {
        let entries = wire.as_map();
        let values = schema
            .fields()
            .iter()
            .map(|field| match entries.and_then(|e| e.get(field.name())) {
                Some(item) => field.deserialize(item),
                None => field.default_value(),
            })
            .collect();
        Self::from_values(schema, values)
    }

    /// Decode a JSON wire document.
    pub fn from_text(schema: &Arc<Schema>, text: &str) -> Result<Self, CodecError> {
        let wire = codec::decode(text)?;
        Ok(Self::from_wire(schema, &wire))
    }

    fn from_values(schema: &Arc<Schema>, values: Vec<Value>) -> Self {
        Self {
            schema: Arc::clone(schema),
            values,
            observers: Observers::default(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Stored value of a top-level field, by field name.
    pub fn value(&self, field: &str) -> Option<&Value> {
        let index = self.schema.fields().iter().position(|f| f.name() == field)?;
        self.values.get(index)
    }

    /// Top-level fields and their stored values, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(self.values.iter())
    }

    /// Wire document: one entry per top-level field, in declaration order.
    pub fn to_wire(&self) -> Value {
        let entries: IndexMap<String, Value> = self
            .schema
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (field.name().to_string(), field.serialize(value)))
            .collect();
        Value::Map(entries)
    }

    /// Encode the wire document as JSON.
    pub fn to_text(&self) -> Result<String, CodecError> {
        codec::encode(&self.to_wire())
    }

    /// Read a leaf field through its property accessor.
    pub fn get(&self, name: &str) -> Result<&Value, AddressError> {
        let accessor = lookup(&self.schema, name, AccessorKind::Property)?;
        self.slot(accessor)
    }

    /// Write a leaf field through its property accessor. Returns whether
    /// the stored value changed; rejected input changes nothing.
    pub fn set(&mut self, name: &str, raw: impl Into<Value>) -> Result<bool, AddressError> {
        self.write(name, AccessorKind::Property, &[], raw.into())
    }

    /// Read an element of a composite field.
    pub fn get_element(&self, name: &str, path: &[Key]) -> Result<&Value, AddressError> {
        let accessor = lookup(&self.schema, name, AccessorKind::Element)?;
        let field = self.schema.backing_field(accessor);
        field.get_element(self.slot(accessor)?, path)
    }

    /// Write an element of a composite field. Returns whether the stored
    /// value changed; rejected input changes nothing.
    pub fn set_element(
        &mut self,
        name: &str,
        path: &[Key],
        raw: impl Into<Value>,
    ) -> Result<bool, AddressError> {
        self.write(name, AccessorKind::Element, path, raw.into())
    }

    /// Nested instance held by a model field.
    pub fn nested(&self, name: &str) -> Result<&Model, AddressError> {
        self.get(name)?
            .as_model()
            .ok_or_else(|| AddressError::NotModel(name.to_string()))
    }

    /// Mutable nested instance held by a model field. Changes made through
    /// it notify the nested instance's observers only.
    pub fn nested_mut(&mut self, name: &str) -> Result<&mut Model, AddressError> {
        let accessor = lookup(&self.schema, name, AccessorKind::Property)?;
        if !matches!(self.schema.backing_field(accessor).kind(), FieldKind::Model(_)) {
            return Err(AddressError::NotModel(name.to_string()));
        }
        match self.values.get_mut(accessor.field_index()) {
            Some(Value::Model(model)) => Ok(&mut **model),
            _ => Err(AddressError::NotModel(name.to_string())),
        }
    }

    /// Listen to every change of this instance.
    pub fn on_change<F>(&mut self, callback: F) -> Subscription
    where
        F: Fn(&Model, &ChangeEvent) + Send + Sync + 'static,
    {
        self.add_listener(Arc::new(ClosureListener::new(callback)))
    }

    /// Attach a tree-wide listener.
    pub fn add_listener(&mut self, listener: Arc<dyn ChangeListener>) -> Subscription {
        self.observers.subscribe(Channel::Tree, listener)
    }

    /// Listen to changes written through one accessor.
    pub fn on_field_change<F>(&mut self, name: &str, callback: F) -> Result<Subscription, AddressError>
    where
        F: Fn(&Model, &ChangeEvent) + Send + Sync + 'static,
    {
        if self.schema.accessor(name).is_none() {
            return Err(AddressError::UnknownAccessor(name.to_string()));
        }
        Ok(self.observers.subscribe(
            Channel::Field(name.to_string()),
            Arc::new(ClosureListener::new(callback)),
        ))
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        self.observers.unsubscribe(sub)
    }

    fn slot(&self, accessor: &Accessor) -> Result<&Value, AddressError> {
        self.values
            .get(accessor.field_index())
            .ok_or_else(|| AddressError::UnknownAccessor(accessor.name().to_string()))
    }

    fn write(
        &mut self,
        name: &str,
        kind: AccessorKind,
        path: &[Key],
        raw: Value,
    ) -> Result<bool, AddressError> {
        let schema = Arc::clone(&self.schema);
        let accessor = lookup(&schema, name, kind)?;
        let field = schema.backing_field(accessor);
        let slot = self
            .values
            .get_mut(accessor.field_index())
            .ok_or_else(|| AddressError::UnknownAccessor(name.to_string()))?;
        if !field.set_element(slot, path, &raw)? {
            return Ok(false);
        }
        let event = ChangeEvent {
            field: field.name().to_string(),
            path: path.to_vec(),
            value: field.get_element(slot, path)?.clone(),
        };
        let this: &Model = self;
        this.observers.emit(this, accessor.name(), &event);
        Ok(true)
    }
}

fn lookup<'s>(schema: &'s Schema, name: &str, kind: AccessorKind) -> Result<&'s Accessor, AddressError> {
    let accessor = schema
        .accessor(name)
        .ok_or_else(|| AddressError::UnknownAccessor(name.to_string()))?;
    match (accessor.kind(), kind) {
        (AccessorKind::Property, AccessorKind::Element) => Err(AddressError::NotElement(name.to_string())),
        (AccessorKind::Element, AccessorKind::Property) => Err(AddressError::NotProperty(name.to_string())),
        _ => Ok(accessor),
    }
}

// Deep copy of storage; observers stay with the original.
impl Clone for Model {
    fn clone(&self) -> Self {
        Self::from_values(&self.schema, self.values.clone())
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.values == other.values
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.name());
        for (name, value) in self.values() {
            s.field(name, value);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, ListOptions};
    use crate::path;
    use crate::schema::SchemaBuilder;
    use std::sync::Mutex;

    fn shape() -> Arc<Schema> {
        SchemaBuilder::new("Shape")
            .field(Field::integer("width").with_default(32).with_min(1).with_max(1000))
            .field(Field::boolean("isFilled"))
            .field(Field::structure(
                "position",
                [
                    Field::integer("x").with_default(32).with_max(256),
                    Field::integer("y").with_default(24).with_max(192),
                ],
            ))
            .field(Field::list(
                "bitmap",
                Field::boolean("cell"),
                ListOptions::length(4).element_name("pixel"),
            ))
            .build()
            .expect("valid schema")
    }

    #[test]
    fn test_construction_falls_back() {
        let schema = shape();
        let model = Model::new(
            &schema,
            &Value::map([("width", Value::from("too big")), ("isFilled", Value::from(1))]),
        );
        assert_eq!(model.get("width"), Ok(&Value::Integer(32)));
        assert_eq!(model.get("isFilled"), Ok(&Value::Bool(true)));
        assert_eq!(model.get_element("position", &path!["y"]), Ok(&Value::Integer(24)));
    }

    #[test]
    fn test_accessor_kinds_enforced() {
        let mut model = Model::with_defaults(&shape());
        assert_eq!(
            model.get("position"),
            Err(AddressError::NotProperty("position".into()))
        );
        assert_eq!(
            model.set_element("width", &[], 3),
            Err(AddressError::NotElement("width".into()))
        );
        assert_eq!(
            model.get("bitmap"),
            Err(AddressError::UnknownAccessor("bitmap".into()))
        );
    }

    #[test]
    fn test_notifications_carry_path() {
        let mut model = Model::with_defaults(&shape());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        model.on_change(move |m, event| {
            // Storage already holds the new value.
            let current = m
                .get_element("pixel", &event.path)
                .cloned()
                .unwrap_or(Value::Null);
            sink.lock().expect("events lock").push((event.clone(), current));
        });

        assert_eq!(model.set_element("pixel", &path![2], true), Ok(true));
        assert_eq!(model.set_element("pixel", &path![2], "yes"), Ok(false));

        let events = events.lock().expect("events lock");
        assert_eq!(events.len(), 1);
        let (event, current) = &events[0];
        assert_eq!(event.field, "bitmap");
        assert_eq!(event.path, path![2]);
        assert_eq!(event.value, Value::Bool(true));
        assert_eq!(current, &Value::Bool(true));
    }

    #[test]
    fn test_field_subscription_requires_accessor() {
        let mut model = Model::with_defaults(&shape());
        assert!(model.on_field_change("pixel", |_, _| {}).is_ok());
        assert_eq!(
            model.on_field_change("nope", |_, _| {}).err(),
            Some(AddressError::UnknownAccessor("nope".into()))
        );
    }

    #[test]
    fn test_clone_is_deep_and_silent() {
        let mut original = Model::with_defaults(&shape());
        original.on_change(|_, _| panic!("clone must not share observers"));
        let mut copy = original.clone();
        assert_eq!(copy, original);
        assert_eq!(copy.set("width", 64), Ok(true));
        assert_eq!(original.get("width"), Ok(&Value::Integer(32)));
        assert_ne!(copy, original);
    }

    #[test]
    fn test_wire_and_text() {
        let schema = shape();
        let model = Model::new(&schema, &Value::map([("position", Value::map([("x", 128)]))]));
        let text = model.to_text().expect("encode");
        assert_eq!(
            text,
            r#"{"width":32,"isFilled":null,"position":{"x":128,"y":24},"bitmap":[null,null,null,null]}"#
        );
        let back = Model::from_text(&schema, &text).expect("decode");
        assert_eq!(back, model);
    }
}
