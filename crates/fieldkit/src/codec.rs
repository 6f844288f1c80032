// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON text codec for primitive trees.
//!
//! Object key order is preserved in both directions.

use crate::error::CodecError;
use crate::value::Value;

/// Compact JSON.
pub fn encode(value: &Value) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

/// Indented JSON.
pub fn encode_pretty(value: &Value) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn decode(text: &str) -> Result<Value, CodecError> {
    Ok(serde_json::from_str(text)?)
}
