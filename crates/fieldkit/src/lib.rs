// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # fieldkit - runtime schema engine
//!
//! Declare a typed, nested data shape once as a tree of fields and get
//! validated mutation, default synthesis, change notification and
//! bidirectional conversion to a plain primitive tree (JSON-ready).
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldkit::{path, Field, ListOptions, Model, SchemaBuilder, Value};
//!
//! let sprite = SchemaBuilder::new("Sprite")
//!     .field(Field::integer("width").with_default(8).with_min(1).with_max(64))
//!     .field(Field::structure(
//!         "position",
//!         [
//!             Field::integer("x").with_default(32).with_max(256),
//!             Field::integer("y").with_default(24).with_max(192),
//!         ],
//!     ))
//!     .field(Field::list(
//!         "bitmap",
//!         Field::boolean("cell"),
//!         ListOptions::length(64).element_name("pixel"),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let mut model = Model::new(&sprite, &Value::map([("position", Value::map([("x", 128)]))]));
//!
//! assert_eq!(model.get_element("position", &path!["y"]).unwrap(), &Value::Integer(24));
//! assert!(model.set_element("position", &path!["y"], 999).unwrap());
//! assert_eq!(model.get_element("position", &path!["y"]).unwrap(), &Value::Integer(192));
//!
//! model.set("width", "not a number").unwrap(); // discarded
//! assert_eq!(model.get("width").unwrap(), &Value::Integer(8));
//!
//! let text = model.to_text().unwrap();
//! assert_eq!(Model::from_text(&sprite, &text).unwrap(), model);
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Value`] | Raw input, stored value and wire tree |
//! | [`Field`] | One field declaration (scalar, enum, model, list, struct, tuple) |
//! | [`Schema`] | Resolved fields plus accessor table, built by [`SchemaBuilder`] |
//! | [`Model`] | Instance of a schema: storage, accessors, observers |
//!
//! ## Features
//!
//! - `loaders` (default): build schemas from YAML or JSON documents
//!   ([`SchemaSet`]).
//!
//! ## Logging
//!
//! Logs through the `log` facade; install any logger to see schema
//! construction and discarded input.

#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod field;
#[cfg(feature = "loaders")]
pub mod loader;
pub mod model;
mod naming;
pub mod notify;
pub mod schema;
pub mod value;

pub use error::{AddressError, CodecError, ConfigError, ValidationError};
pub use field::{Bounds, EnumChoice, Field, FieldKind, ListOptions, MAX_LIST_SLOTS};
#[cfg(feature = "loaders")]
pub use loader::{LoadError, SchemaSet};
pub use model::Model;
pub use notify::{ChangeEvent, ChangeListener, ClosureListener, Subscription};
pub use schema::{Accessor, AccessorKind, Schema, SchemaBuilder};
pub use value::{Key, Value};
