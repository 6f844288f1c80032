// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative schema documents (YAML or JSON).
//!
//! # Example YAML
//!
//! ```yaml
//! models:
//!   - name: Band
//!     fields:
//!       - { name: name, kind: value }
//!       - { name: founded, kind: integer, min: 1900 }
//!   - name: Artist
//!     fields:
//!       - { name: name, kind: value, default: "Unknown" }
//!       - { name: band, kind: model, schema: Band }
//!       - name: scores
//!         kind: list
//!         length: 3
//!         element_name: score
//!         of: { name: score, kind: number, max: 10 }
//! ```
//!
//! Models may only reference models declared before them.

use crate::error::ConfigError;
use crate::field::{Field, ListOptions};
use crate::schema::{Schema, SchemaBuilder};
use crate::value::Value;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Schema document loading failure.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("field '{field}' references unknown model '{model}'")]
    UnknownModel { field: String, model: String },

    #[error("model '{0}' is declared twice")]
    DuplicateModel(String),
}

/// Root document.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub models: Vec<ModelDoc>,
}

/// One model declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDoc {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDoc>,
}

/// One field declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDoc {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(flatten)]
    pub kind: KindDoc,
}

/// Kind-specific part of a field declaration, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KindDoc {
    Value,
    Integer {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Number {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Boolean,
    Enum {
        choices: Vec<ChoiceDoc>,
    },
    Model {
        schema: String,
    },
    List {
        of: Box<FieldDoc>,
        #[serde(default)]
        length: Option<usize>,
        #[serde(default, alias = "startIndex")]
        start_index: usize,
        #[serde(default, alias = "endIndex")]
        end_index: Option<usize>,
        #[serde(default, alias = "elementName")]
        element_name: Option<String>,
    },
    Struct {
        fields: Vec<FieldDoc>,
    },
    Tuple {
        fields: Vec<FieldDoc>,
    },
}

/// One enum choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceDoc {
    pub value: Value,
    pub label: String,
}

impl FieldDoc {
    fn to_field(&self, known: &IndexMap<String, Arc<Schema>>) -> Result<Field, LoadError> {
        let mut field = match &self.kind {
            KindDoc::Value => Field::value(&self.name),
            KindDoc::Integer { min, max } => with_bounds(Field::integer(&self.name), *min, *max),
            KindDoc::Number { min, max } => with_bounds(Field::number(&self.name), *min, *max),
            KindDoc::Boolean => Field::boolean(&self.name),
            KindDoc::Enum { choices } => Field::enumeration(
                &self.name,
                choices.iter().map(|c| (c.value.clone(), c.label.clone())),
            ),
            KindDoc::Model { schema } => {
                let target = known.get(schema).ok_or_else(|| LoadError::UnknownModel {
                    field: self.name.clone(),
                    model: schema.clone(),
                })?;
                Field::model(&self.name, target)
            }
            KindDoc::List {
                of,
                length,
                start_index,
                end_index,
                element_name,
            } => {
                let options = ListOptions {
                    length: *length,
                    start_index: *start_index,
                    end_index: *end_index,
                    element_name: element_name.clone(),
                };
                Field::list(&self.name, of.to_field(known)?, options)
            }
            KindDoc::Struct { fields } => Field::structure(&self.name, convert_all(fields, known)?),
            KindDoc::Tuple { fields } => Field::tuple(&self.name, convert_all(fields, known)?),
        };
        if let Some(label) = &self.label {
            field = field.with_label(label);
        }
        if let Some(default) = &self.default {
            field = field.with_default(default.clone());
        }
        Ok(field)
    }
}

fn with_bounds(mut field: Field, min: Option<f64>, max: Option<f64>) -> Field {
    if let Some(min) = min {
        field = field.with_min(min);
    }
    if let Some(max) = max {
        field = field.with_max(max);
    }
    field
}

fn convert_all(
    docs: &[FieldDoc],
    known: &IndexMap<String, Arc<Schema>>,
) -> Result<Vec<Field>, LoadError> {
    docs.iter().map(|doc| doc.to_field(known)).collect()
}

/// Schemas built from one document, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    schemas: IndexMap<String, Arc<Schema>>,
}

impl SchemaSet {
    /// Build every model of a parsed document.
    pub fn from_document(doc: &SchemaDocument) -> Result<Self, LoadError> {
        let mut schemas: IndexMap<String, Arc<Schema>> = IndexMap::new();
        for model in &doc.models {
            if schemas.contains_key(&model.name) {
                return Err(LoadError::DuplicateModel(model.name.clone()));
            }
            let fields = convert_all(&model.fields, &schemas)?;
            let schema = SchemaBuilder::new(&model.name).fields(fields).build()?;
            schemas.insert(model.name.clone(), schema);
        }
        log::debug!("[fieldkit] loaded {} schema(s)", schemas.len());
        Ok(Self { schemas })
    }

    pub fn from_yaml(text: &str) -> Result<Self, LoadError> {
        let doc: SchemaDocument = serde_yaml::from_str(text)?;
        Self::from_document(&doc)
    }

    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let doc: SchemaDocument = serde_json::from_str(text)?;
        Self::from_document(&doc)
    }

    /// Load a document from disk; `.json` files are parsed as JSON,
    /// everything else as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    /// Last declared model: the one that may reference all others.
    pub fn last(&self) -> Option<&Arc<Schema>> {
        self.schemas.values().last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
