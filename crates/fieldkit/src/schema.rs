// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema: an ordered list of top-level fields plus the accessor table
//! built from them.
//!
//! The accessor table is computed once, when the schema is built, and
//! shared by every instance through `Arc<Schema>`. Leaf fields get a
//! property accessor under their own name; composite fields get an
//! element accessor under their element name.
//!
//! # Example
//!
//! ```
//! use fieldkit::{AccessorKind, Field, ListOptions, SchemaBuilder};
//!
//! let sprite = SchemaBuilder::new("Sprite")
//!     .field(Field::integer("width").with_default(8))
//!     .field(Field::list(
//!         "bitmap",
//!         Field::boolean("cell"),
//!         ListOptions::length(64).element_name("pixel"),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let pixel = sprite.accessor("pixel").unwrap();
//! assert_eq!(pixel.kind(), AccessorKind::Element);
//! assert_eq!(pixel.getter_name(), "getPixel");
//! assert_eq!(pixel.channel(), "changePixel");
//! ```

use crate::error::ConfigError;
use crate::field::Field;
use crate::naming;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

/// How an accessor reaches its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    /// Whole-value get/set of a leaf field.
    Property,
    /// Addressed get/set inside a composite field.
    Element,
}

/// One entry of a schema's accessor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    name: String,
    field: usize,
    kind: AccessorKind,
}

impl Accessor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the backing field in [`Schema::fields`].
    pub fn field_index(&self) -> usize {
        self.field
    }

    pub fn kind(&self) -> AccessorKind {
        self.kind
    }

    /// Conventional getter name for hosts (`getPixel`).
    pub fn getter_name(&self) -> String {
        naming::prefixed("get", &self.name)
    }

    /// Conventional setter name for hosts (`setPixel`).
    pub fn setter_name(&self) -> String {
        naming::prefixed("set", &self.name)
    }

    /// Field-scoped notification channel (`changePixel`).
    pub fn channel(&self) -> String {
        naming::prefixed("change", &self.name)
    }
}

/// Immutable description of a model type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
    accessors: IndexMap<String, Accessor>,
}

impl Schema {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Top-level field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Accessor by name.
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    /// Accessor table in declaration order.
    pub fn accessors(&self) -> impl Iterator<Item = &Accessor> {
        self.accessors.values()
    }

    /// Resolve a conventional host method name (`getX`, `setX`) to its
    /// accessor and whether it writes.
    pub fn method(&self, method: &str) -> Option<(&Accessor, bool)> {
        self.accessors.values().find_map(|acc| {
            if acc.getter_name() == method {
                Some((acc, false))
            } else if acc.setter_name() == method {
                Some((acc, true))
            } else {
                None
            }
        })
    }

    pub(crate) fn backing_field(&self, accessor: &Accessor) -> &Field {
        &self.fields[accessor.field]
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a top-level field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append several top-level fields.
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Resolve every field and build the accessor table.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] raised by a field declaration, a duplicate
    /// top-level field name, or two fields claiming the same accessor name.
    pub fn build(self) -> Result<Arc<Schema>, ConfigError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            if !seen.insert(field.name().to_string()) {
                return Err(ConfigError::DuplicateName {
                    parent: self.name,
                    name: field.name().to_string(),
                });
            }
            fields.push(field.resolved()?);
        }

        let mut accessors = IndexMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            let kind = if field.is_composite() {
                AccessorKind::Element
            } else {
                AccessorKind::Property
            };
            let name = field.accessor_name().to_string();
            if accessors.contains_key(&name) {
                return Err(ConfigError::DuplicateAccessor {
                    schema: self.name,
                    name,
                });
            }
            accessors.insert(
                name.clone(),
                Accessor {
                    name,
                    field: index,
                    kind,
                },
            );
        }

        log::debug!(
            "[fieldkit] schema '{}' built: {} fields, {} accessors",
            self.name,
            fields.len(),
            accessors.len()
        );

        Ok(Arc::new(Schema {
            name: self.name,
            fields,
            accessors,
        }))
    }
}
