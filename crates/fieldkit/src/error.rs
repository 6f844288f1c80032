// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types.
//!
//! Three kinds, with three different recovery rules:
//!
//! - [`ValidationError`]: raw input could not be coerced by a field's
//!   `clean`. Recovered locally by every caller-facing path (the write is
//!   discarded, or the field falls back to its default).
//! - [`ConfigError`]: the schema declaration itself is incoherent. Raised
//!   by [`SchemaBuilder::build`](crate::SchemaBuilder::build) before any
//!   instance exists.
//! - [`AddressError`]: the caller used the schema wrongly (unknown
//!   accessor, path into a leaf, index outside a list's range). Always
//!   returned to the caller, never swallowed.

use crate::value::Key;
use thiserror::Error;

/// Raw input rejected by a field's `clean`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for field '{field}': {reason}")]
pub struct ValidationError {
    /// Name of the rejecting field.
    pub field: String,
    /// Human-readable reason.
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Incoherent static schema configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("list field '{field}': either length or endIndex must be specified")]
    MissingListRange { field: String },

    #[error("list field '{field}': start index {start} is past end index {end}")]
    InvertedListRange {
        field: String,
        start: usize,
        end: usize,
    },

    #[error("list field '{field}': range end exceeds {limit} slots")]
    ListRangeOverflow { field: String, limit: usize },

    #[error("field '{field}': bounds are only valid on integer and number fields, not {kind}")]
    MisplacedBounds { field: String, kind: &'static str },

    #[error("duplicate field name '{name}' in '{parent}'")]
    DuplicateName { parent: String, name: String },

    #[error("duplicate accessor '{name}' in schema '{schema}'")]
    DuplicateAccessor { schema: String, name: String },

    #[error("field '{field}': declared default is invalid: {reason}")]
    InvalidDefault { field: String, reason: String },

    #[error("field '{field}': minimum {min} is greater than maximum {max}")]
    InvertedBounds { field: String, min: f64, max: f64 },

    #[error("enum field '{field}' declares no choices")]
    EmptyChoices { field: String },
}

/// Misuse of the addressing protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("no accessor named '{0}'")]
    UnknownAccessor(String),

    #[error("'{0}' is a property; use get/set")]
    NotElement(String),

    #[error("'{0}' addresses a composite field; use get_element/set_element")]
    NotProperty(String),

    #[error("'{0}' is not a nested model field")]
    NotModel(String),

    #[error("field '{field}' is indexed by {expected}, got key '{key}'")]
    WrongKeyKind {
        field: String,
        expected: &'static str,
        key: Key,
    },

    #[error("index {index} is outside [{start}, {end}) of field '{field}'")]
    IndexOutOfRange {
        field: String,
        index: usize,
        start: usize,
        end: usize,
    },

    #[error("field '{field}' has no member '{name}'")]
    UnknownMember { field: String, name: String },

    #[error("path continues past leaf field '{field}' at key '{key}'")]
    PastLeaf { field: String, key: Key },

    #[error("stored value of field '{field}' does not have its declared shape")]
    ShapeMismatch { field: String },
}

/// Text codec failure.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
